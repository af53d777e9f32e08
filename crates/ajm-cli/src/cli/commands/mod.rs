//! CLI command handlers, one per file.

mod config;
mod plan;
mod simulate;

pub use config::run_show_config;
pub use plan::run_plan;
pub use simulate::{run_simulate, SimulateArgs};
