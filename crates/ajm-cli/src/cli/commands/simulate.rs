//! `ajm simulate` – drive the scheduler against the simulated backend.

use ajm_core::config::AjmConfig;
use ajm_core::job::JobParams;
use ajm_core::scheduler::Scheduler;
use ajm_core::sim::SimulatedApi;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::time::Instant;

/// Arguments of `ajm simulate` after parsing.
#[derive(Debug, Clone)]
pub struct SimulateArgs {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub window_days: Option<u32>,
    pub failures: Vec<(NaiveDate, u32)>,
    pub params: Vec<(String, Value)>,
    pub poll_interval_ms: Option<u64>,
}

pub fn run_simulate(cfg: &AjmConfig, args: SimulateArgs) -> Result<()> {
    if args.from > args.to {
        anyhow::bail!("--from {} is after --to {}", args.from, args.to);
    }

    let mut sched_cfg = cfg.scheduler.clone();
    if let Some(days) = args.window_days {
        sched_cfg.window_size_days = days;
    }
    if let Some(ms) = args.poll_interval_ms {
        sched_cfg.poll_interval_secs = ms as f64 / 1000.0;
    }
    sched_cfg.validate()?;

    let mut api = SimulatedApi::new(cfg.simulation.clone().unwrap_or_default());
    for (since, count) in &args.failures {
        api.fail_window(*since, *count);
    }
    let template: JobParams = args.params.into_iter().collect();

    let started = Instant::now();
    let mut scheduler = Scheduler::new(api, sched_cfg, args.from, args.to, template);
    scheduler.add_more_jobs().context("initial submission")?;

    println!("{:<6} {:<12} {:<12} {:<9} {}", "#", "SINCE", "UNTIL", "ATTEMPTS", "RUN");
    let mut delivered = 0usize;
    for job in scheduler.completed_jobs() {
        let job = job.with_context(|| format!("after {} delivered window(s)", delivered))?;
        delivered += 1;
        let w = job.window();
        println!(
            "{:<6} {:<12} {:<12} {:<9} {}",
            delivered,
            w.since.format("%Y-%m-%d"),
            w.until.format("%Y-%m-%d"),
            job.attempts(),
            job.run_id().map(|r| r.as_str()).unwrap_or("-")
        );
    }

    let api = scheduler.api();
    println!(
        "{} window(s) delivered, {} submission(s), {} status round trip(s) in {:.1?}",
        delivered,
        api.submissions().len(),
        api.round_trips(),
        started.elapsed()
    );
    tracing::info!(
        delivered,
        submissions = api.submissions().len(),
        round_trips = api.round_trips(),
        "simulation finished"
    );
    Ok(())
}
