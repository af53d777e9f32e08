use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RestartPolicy;

/// Scheduler tuning (the `[scheduler]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// No new jobs are submitted while effective throttle is at or above this
    /// value; above it the scheduler waits.
    pub throttle_limit: f64,
    /// Maximum submissions per window (including the first) before its
    /// failure is final.
    pub max_restarts: u32,
    /// Fixed delay in seconds between polls (job status and throttle).
    pub poll_interval_secs: f64,
    /// Maximum number of queued jobs that are not yet completed.
    pub max_in_flight: usize,
    /// Number of jobs from the queue head whose status is checked per poll.
    pub lookahead_count: usize,
    /// Days covered by one job window.
    pub window_size_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            throttle_limit: 70.0,
            max_restarts: 5,
            poll_interval_secs: 30.0,
            max_in_flight: 10,
            lookahead_count: 10,
            window_size_days: 1,
        }
    }
}

impl SchedulerConfig {
    /// Poll interval as a Duration (invalid values map to zero; see `validate`).
    pub fn poll_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.poll_interval_secs).unwrap_or(Duration::ZERO)
    }

    pub fn restart_policy(&self) -> RestartPolicy {
        RestartPolicy::new(self.max_restarts)
    }

    /// Reject values the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.throttle_limit.is_finite() {
            return Err(ConfigError::Invalid {
                field: "throttle_limit",
                reason: "must be a finite number",
            });
        }
        if !self.poll_interval_secs.is_finite() || self.poll_interval_secs < 0.0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_secs",
                reason: "must be a finite, non-negative number",
            });
        }
        for (field, value) in [
            ("max_restarts", self.max_restarts as usize),
            ("max_in_flight", self.max_in_flight),
            ("lookahead_count", self.lookahead_count),
            ("window_size_days", self.window_size_days as usize),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1",
                });
            }
        }
        Ok(())
    }
}

/// Parameters of the in-process simulated backend (optional `[simulation]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Service ticks (status round trips or throttle refreshes) a run takes to finish.
    pub ticks_to_complete: u64,
    /// App-scope pressure with nothing running.
    pub app_pressure_base: f64,
    /// Account-scope pressure; stays put regardless of load.
    pub account_pressure: f64,
    /// App-scope pressure added per unfinished run.
    pub pressure_per_running_job: f64,
    /// Status checks answered per round trip; the rest come back as a residual batch.
    pub batch_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks_to_complete: 3,
            app_pressure_base: 5.0,
            account_pressure: 100.0,
            pressure_per_running_job: 8.0,
            batch_capacity: 50,
        }
    }
}

/// Global configuration loaded from `~/.config/ajm/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AjmConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Optional simulated backend parameters; if missing, built-in defaults are used.
    #[serde(default)]
    pub simulation: Option<SimulationConfig>,
}

/// Configuration rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ajm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AjmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AjmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load and validate configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<AjmConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: AjmConfig = toml::from_str(&data)?;
    cfg.scheduler.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = AjmConfig::default();
        assert_eq!(cfg.scheduler.throttle_limit, 70.0);
        assert_eq!(cfg.scheduler.max_restarts, 5);
        assert_eq!(cfg.scheduler.poll_interval(), Duration::from_secs(30));
        assert_eq!(cfg.scheduler.max_in_flight, 10);
        assert_eq!(cfg.scheduler.lookahead_count, 10);
        assert_eq!(cfg.scheduler.window_size_days, 1);
        assert!(cfg.simulation.is_none());
        assert!(cfg.scheduler.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = AjmConfig {
            simulation: Some(SimulationConfig::default()),
            ..Default::default()
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: AjmConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_section_uses_defaults() {
        let toml = r#"
            [scheduler]
            throttle_limit = 50
            poll_interval_secs = 0.5
        "#;
        let cfg: AjmConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.scheduler.throttle_limit, 50.0);
        assert_eq!(cfg.scheduler.poll_interval(), Duration::from_millis(500));
        assert_eq!(cfg.scheduler.max_in_flight, 10);
        assert!(cfg.simulation.is_none());
    }

    #[test]
    fn config_toml_empty_file() {
        let cfg: AjmConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, AjmConfig::default());
    }

    #[test]
    fn config_toml_simulation_section() {
        let toml = r#"
            [simulation]
            ticks_to_complete = 1
            batch_capacity = 2
        "#;
        let cfg: AjmConfig = toml::from_str(toml).unwrap();
        let sim = cfg.simulation.unwrap();
        assert_eq!(sim.ticks_to_complete, 1);
        assert_eq!(sim.batch_capacity, 2);
        assert_eq!(sim.account_pressure, 100.0);
    }

    #[test]
    fn validate_rejects_zero_and_negative_values() {
        let bad = SchedulerConfig {
            max_in_flight: 0,
            ..Default::default()
        };
        assert_eq!(
            bad.validate(),
            Err(ConfigError::Invalid {
                field: "max_in_flight",
                reason: "must be at least 1"
            })
        );

        let bad = SchedulerConfig {
            poll_interval_secs: -1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert_eq!(bad.poll_interval(), Duration::ZERO);

        let bad = SchedulerConfig {
            throttle_limit: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn load_from_path_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[scheduler]\nmax_restarts = 2\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.scheduler.max_restarts, 2);
        assert_eq!(cfg.scheduler.restart_policy(), RestartPolicy::new(2));

        fs::write(&path, "[scheduler]\nwindow_size_days = 0\n").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("window_size_days"));
    }
}
