//! `ajm plan` – print the window tiling of a date range.

use ajm_core::config::AjmConfig;
use ajm_core::partition::plan_windows;
use anyhow::Result;
use chrono::NaiveDate;

pub fn run_plan(
    cfg: &AjmConfig,
    from: NaiveDate,
    to: NaiveDate,
    window_days: Option<u32>,
) -> Result<()> {
    if from > to {
        anyhow::bail!("--from {} is after --to {}", from, to);
    }
    let days = window_days.unwrap_or(cfg.scheduler.window_size_days).max(1);
    let windows = plan_windows(from, to, days);
    println!("{:<6} {:<12} {:<12} {}", "#", "SINCE", "UNTIL", "DAYS");
    for (i, w) in windows.iter().enumerate() {
        println!(
            "{:<6} {:<12} {:<12} {}",
            i + 1,
            w.since.format("%Y-%m-%d"),
            w.until.format("%Y-%m-%d"),
            w.days()
        );
    }
    println!("{} window(s) of up to {} day(s)", windows.len(), days);
    Ok(())
}
