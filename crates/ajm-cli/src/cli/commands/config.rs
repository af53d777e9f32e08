//! `ajm config` – show where config lives and what is in effect.

use ajm_core::config::{self, AjmConfig};
use anyhow::Result;
use std::path::Path;

pub fn run_show_config(cfg: &AjmConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    let mut effective = cfg.clone();
    effective.simulation.get_or_insert_with(Default::default);
    print!("{}", toml::to_string_pretty(&effective)?);
    Ok(())
}
