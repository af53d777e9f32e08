pub mod config;
pub mod logging;

pub mod api;
pub mod clock;
pub mod job;
pub mod partition;
pub mod retry;
pub mod scheduler;
pub mod sim;
