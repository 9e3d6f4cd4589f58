pub mod domains;
#[cfg(all(test, unix))]
mod test_support;

use cf_perf_core::experiment::Experiment;
use cf_perf_core::report::{ExperimentReport, Report};
use cf_perf_core::SuiteSetup;

use crate::utils::print_experiment;
use domains::DomainCase;

/// Measurement name every case records its samples under.
pub const REQUEST_TIME: &str = "request time";

/// Case selection for one run.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Only cases whose name contains this
    pub focus: Option<String>,
    pub skip_destructive: bool,
}

impl Selection {
    pub fn includes(&self, name: &str, destructive: bool) -> bool {
        if destructive && self.skip_destructive {
            return false;
        }
        self.focus
            .as_deref()
            .map_or(true, |focus| name.contains(focus))
    }
}

/// Runs every selected domains case in order. A failing case is recorded
/// and the run moves on to the next one.
pub async fn run_domains(suite: &SuiteSetup, selection: &Selection, quiet: bool) -> Report {
    let large_page_size = suite.config().large_page_size;
    let mut report = Report::new(suite.config());

    for case in DomainCase::all() {
        let name = case.name(large_page_size);
        if !selection.includes(&name, case.destructive()) {
            tracing::info!("Skipping {}", name);
            report.push(ExperimentReport::skipped(&name));
            continue;
        }

        tracing::info!("Running {}", name);
        let mut experiment = Experiment::new(&name);
        let error = match case.run(suite, &mut experiment).await {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("{} failed: {}", name, e);
                Some(e.to_string())
            }
        };

        let entry = ExperimentReport::new(&experiment, error);
        if !quiet {
            print_experiment(&entry);
        }
        report.push(entry);
    }

    report
}
