//! JSON run reports.

use crate::config::Config;
use crate::error::{PerfError, Result};
use crate::experiment::{Experiment, Stats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn millis(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// Stats in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsReport {
    pub count: usize,
    pub min_ms: f64,
    pub median_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
    pub std_dev_ms: f64,
}

impl From<Stats> for StatsReport {
    fn from(stats: Stats) -> Self {
        Self {
            count: stats.count,
            min_ms: millis(stats.min),
            median_ms: millis(stats.median),
            mean_ms: millis(stats.mean),
            max_ms: millis(stats.max),
            std_dev_ms: millis(stats.std_dev),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementReport {
    pub name: String,
    pub samples_ms: Vec<f64>,
    pub stats: Option<StatsReport>,
}

/// One case: its samples, and the error that ended it early, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentReport {
    pub name: String,
    pub measurements: Vec<MeasurementReport>,
    #[serde(default)]
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExperimentReport {
    pub fn new(experiment: &Experiment, error: Option<String>) -> Self {
        let measurements = experiment
            .measurements()
            .iter()
            .map(|m| MeasurementReport {
                name: m.name.clone(),
                samples_ms: m.durations.iter().copied().map(millis).collect(),
                stats: m.stats().map(StatsReport::from),
            })
            .collect();
        Self {
            name: experiment.name().to_string(),
            measurements,
            skipped: false,
            error,
        }
    }

    /// A case that was never sampled.
    pub fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            measurements: Vec::new(),
            skipped: true,
            error: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything measured in one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub api: String,
    pub cf_deployment_version: Option<String>,
    pub capi_version: Option<String>,
    pub experiments: Vec<ExperimentReport>,
}

impl Report {
    pub fn new(config: &Config) -> Self {
        Self {
            generated_at: Utc::now(),
            api: config.api.clone(),
            cf_deployment_version: config.cf_deployment_version.clone(),
            capi_version: config.capi_version.clone(),
            experiments: Vec::new(),
        }
    }

    pub fn push(&mut self, experiment: ExperimentReport) {
        self.experiments.push(experiment);
    }

    pub fn failures(&self) -> usize {
        self.experiments
            .iter()
            .filter(|e| e.error.is_some())
            .count()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| PerfError::Json {
            path: "report".to_string(),
            source,
        })
    }

    /// File name used inside the results folder.
    pub fn file_name(&self, prefix: &str) -> String {
        format!(
            "{}-{}.json",
            prefix,
            self.generated_at.format("%Y%m%dT%H%M%SZ")
        )
    }

    /// Writes the report into `folder`, creating it if needed.
    pub fn write_to(&self, folder: &Path, prefix: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(folder)?;
        let path = folder.join(self.file_name(prefix));
        std::fs::write(&path, self.to_json()?)?;
        tracing::info!("Wrote report to {}", path.display());
        Ok(path)
    }
}
