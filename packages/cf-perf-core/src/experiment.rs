//! Sampling experiments.
//!
//! An experiment repeatedly runs an operation and records one duration per
//! sample under a measurement name. Sampling ends at `n` samples or after
//! `duration` of wall-clock time, whichever comes first.

use crate::config::Config;
use crate::error::{PerfError, Result};
use hdrhistogram::Histogram;
use std::future::Future;
use std::time::{Duration, Instant};

/// Bounds for one sampling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    /// Maximum number of samples, 0 = no count bound
    pub n: usize,
    /// Maximum total sampling time, zero = no time bound
    pub duration: Duration,
}

impl SamplingConfig {
    pub fn new(n: usize, duration: Duration) -> Self {
        Self { n, duration }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.samples, config.sample_length)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n == 0 && self.duration.is_zero() {
            return Err(PerfError::Sampling(
                "either a sample count or a duration is required".to_string(),
            ));
        }
        Ok(())
    }

    fn is_done(&self, taken: usize, elapsed: Duration) -> bool {
        (self.n > 0 && taken >= self.n) || (!self.duration.is_zero() && elapsed >= self.duration)
    }
}

/// Lowest and highest trackable sample, in microseconds.
const HISTOGRAM_LOW_US: u64 = 1;
const HISTOGRAM_HIGH_US: u64 = 60 * 60 * 1_000_000;
const HISTOGRAM_SIGFIG: u8 = 3;

fn from_micros(us: f64) -> Duration {
    Duration::from_secs_f64(us.max(0.0) / 1_000_000.0)
}

/// Summary statistics over one measurement, read from an HDR histogram.
///
/// Values carry the histogram's precision (3 significant digits). The median
/// is the 50th percentile, i.e. the lower middle sample for even counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub median: Duration,
    /// Population standard deviation
    pub std_dev: Duration,
}

impl Stats {
    /// Computes stats for `samples`, or `None` when empty.
    pub fn from_durations(samples: &[Duration]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        // Constant bounds, so creation only fails on a programming error.
        let mut hist =
            Histogram::<u64>::new_with_bounds(HISTOGRAM_LOW_US, HISTOGRAM_HIGH_US, HISTOGRAM_SIGFIG)
                .ok()?;
        for sample in samples {
            let us = u64::try_from(sample.as_micros()).unwrap_or(u64::MAX);
            hist.saturating_record(us);
        }

        Some(Self {
            count: samples.len(),
            min: Duration::from_micros(hist.min()),
            max: Duration::from_micros(hist.max()),
            mean: from_micros(hist.mean()),
            median: Duration::from_micros(hist.value_at_quantile(0.5)),
            std_dev: from_micros(hist.stdev()),
        })
    }
}

/// Samples recorded under one name.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub name: String,
    pub durations: Vec<Duration>,
}

impl Measurement {
    pub fn stats(&self) -> Option<Stats> {
        Stats::from_durations(&self.durations)
    }
}

/// A named set of measurements, kept in recording order.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    name: String,
    measurements: Vec<Measurement>,
}

impl Experiment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measurements: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn measurement(&self, name: &str) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.name == name)
    }

    /// Appends one sample to `measurement`, creating it on first use.
    pub fn record_duration(&mut self, measurement: &str, duration: Duration) {
        match self.measurements.iter_mut().find(|m| m.name == measurement) {
            Some(m) => m.durations.push(duration),
            None => self.measurements.push(Measurement {
                name: measurement.to_string(),
                durations: vec![duration],
            }),
        }
    }

    pub fn stats(&self, measurement: &str) -> Option<Stats> {
        self.measurement(measurement).and_then(Measurement::stats)
    }

    /// Runs `op(idx)` until `sampling` is exhausted, recording each returned
    /// duration. The first failing sample stops sampling and is returned.
    pub async fn sample_duration<F, Fut>(
        &mut self,
        measurement: &str,
        sampling: SamplingConfig,
        mut op: F,
    ) -> Result<()>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<Duration>>,
    {
        sampling.validate()?;

        let start = Instant::now();
        let mut idx = 0;
        loop {
            let duration = op(idx).await?;
            self.record_duration(measurement, duration);
            idx += 1;

            if sampling.is_done(idx, start.elapsed()) {
                break;
            }
        }

        tracing::debug!(
            "{}: {} samples in {:?}",
            measurement,
            idx,
            start.elapsed()
        );
        Ok(())
    }
}
