//! Tournament Runner for trained multi-agent policies
//!
//! This crate provides infrastructure for:
//! - Discovering competitor checkpoints in a models directory
//! - Playing every competitor against every other exactly once
//! - Containing broken checkpoints and failed rollouts to a single match
//! - Aggregating decisive wins into a ranking
//!
//! # Usage
//!
//! ```bash
//! # Round robin over every subdirectory of trained_models/
//! cargo run -p tournament -- run --models-dir trained_models --output-dir tournament_logs
//!
//! # Reprint a saved report
//! cargo run -p tournament -- report tournament_logs/results.json
//!
//! # Check that training rollouts record the active mask
//! cargo run -p tournament -- verify --artifact trained_models/pressing
//! ```

mod config;
mod error;
mod executor;
mod loader;
mod registry;
mod results;
mod runner;
mod scheduler;
pub mod telemetry;
pub mod verify;

pub use config::*;
pub use error::*;
pub use executor::*;
pub use loader::*;
pub use registry::*;
pub use results::*;
pub use runner::*;
pub use scheduler::*;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod results_tests;
#[cfg(test)]
mod runner_tests;
