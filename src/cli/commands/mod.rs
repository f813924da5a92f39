//! CLI command implementations.

mod ask;
mod config;
mod doctor;
mod serve;
mod tools;

pub use ask::run_ask;
pub use config::run_config;
pub use doctor::run_doctor;
pub use serve::run_serve;
pub use tools::run_tools;
