//! CLI for the AJM async job manager.

mod commands;

use ajm_core::config::{self, AjmConfig};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use commands::{run_plan, run_show_config, run_simulate, SimulateArgs};

/// Top-level CLI for the AJM async job manager.
#[derive(Debug, Parser)]
#[command(name = "ajm")]
#[command(about = "AJM: throttle-aware scheduler for date-windowed async jobs", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/ajm/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the windows a date range splits into.
    Plan {
        /// First day of the range (YYYY-MM-DD).
        #[arg(long)]
        from: NaiveDate,
        /// Last day of the range, inclusive (YYYY-MM-DD).
        #[arg(long)]
        to: NaiveDate,
        /// Days per window (default from config).
        #[arg(long, value_name = "DAYS")]
        window_days: Option<u32>,
    },

    /// Run the scheduler against the in-process simulated backend.
    Simulate {
        /// First day of the range (YYYY-MM-DD).
        #[arg(long)]
        from: NaiveDate,
        /// Last day of the range, inclusive (YYYY-MM-DD).
        #[arg(long)]
        to: NaiveDate,
        /// Days per window (default from config).
        #[arg(long, value_name = "DAYS")]
        window_days: Option<u32>,
        /// Make the first COUNT runs of the window starting at DATE fail. Repeatable.
        #[arg(long = "fail", value_name = "DATE=COUNT", value_parser = parse_failure)]
        failures: Vec<(NaiveDate, u32)>,
        /// Extra job parameter; VALUE is parsed as JSON, else taken as a string. Repeatable.
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, Value)>,
        /// Delay between polls in milliseconds (default from config).
        #[arg(long, value_name = "MS")]
        poll_interval_ms: Option<u64>,
    },

    /// Show the config file path and effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Plan {
                from,
                to,
                window_days,
            } => run_plan(&cfg, from, to, window_days)?,
            CliCommand::Simulate {
                from,
                to,
                window_days,
                failures,
                params,
                poll_interval_ms,
            } => run_simulate(
                &cfg,
                SimulateArgs {
                    from,
                    to,
                    window_days,
                    failures,
                    params,
                    poll_interval_ms,
                },
            )?,
            CliCommand::Config => run_show_config(&cfg, cli.config.as_deref())?,
        }

        Ok(())
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<AjmConfig> {
    match path {
        Some(p) => config::load_from_path(p)
            .with_context(|| format!("load config from {}", p.display())),
        None => config::load_or_init().context("load config"),
    }
}

/// Parse `DATE=COUNT` for `--fail`.
fn parse_failure(s: &str) -> Result<(NaiveDate, u32), String> {
    let (date, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected DATE=COUNT, got '{}'", s))?;
    let date = date
        .trim()
        .parse::<NaiveDate>()
        .map_err(|e| format!("bad date '{}': {}", date, e))?;
    let count = count
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad count '{}': {}", count, e))?;
    Ok((date, count))
}

/// Parse `KEY=VALUE` for `--param`.
fn parse_param(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("parameter name must not be empty".to_string());
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests;
