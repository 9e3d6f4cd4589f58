//! Harness for benchmarking Cloud Foundry API endpoints through the cf CLI.
//!
//! Provides configuration loading, the CLI process runner, per-user CLI
//! contexts, suite setup/teardown, GUID discovery, sampling experiments
//! and JSON reports.

pub mod cf;
pub mod config;
pub mod error;
pub mod experiment;
pub mod guids;
pub mod report;
pub mod setup;
pub mod user;

pub use cf::CfCli;
pub use config::Config;
pub use error::{PerfError, Result};
pub use experiment::{Experiment, SamplingConfig, Stats};
pub use setup::SuiteSetup;
pub use user::{Role, UserContext};
