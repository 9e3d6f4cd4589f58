//! Benchmark harness error types.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while configuring, driving the CLI, or sampling.
#[derive(Error, Debug)]
pub enum PerfError {
    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),

    /// No configuration file in any search location
    #[error("No config file found (searched: {searched})")]
    ConfigNotFound { searched: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CLI binary could not be started
    #[error("Failed to spawn '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The CLI did not exit within its timeout
    #[error("'{command}' timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// The CLI exited with a non-zero status
    #[error("'{command}' exited with code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A response body was not the expected JSON
    #[error("Invalid JSON from {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A listing returned no resources to pick from
    #[error("Listing {path} returned no resources")]
    EmptyListing { path: String },

    /// A resource was still reachable after the polling window
    #[error("{path} still succeeded after {timeout:?}")]
    StillPresent { path: String, timeout: Duration },

    /// Sampling was asked to run with neither a count nor a duration
    #[error("Invalid sampling config: {0}")]
    Sampling(String),
}

pub type Result<T> = std::result::Result<T, PerfError>;
