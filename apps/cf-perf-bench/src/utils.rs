use cf_perf_core::report::{ExperimentReport, Report};

/// Prints one case's stats in milliseconds.
pub fn print_experiment(entry: &ExperimentReport) {
    println!("\n{}", entry.name);
    println!("{}", "-".repeat(entry.name.len().max(40)));

    if entry.skipped {
        println!("  skipped");
        return;
    }

    for m in &entry.measurements {
        match &m.stats {
            Some(stats) => {
                println!("  {}:", m.name);
                println!("    Samples: {}", stats.count);
                println!(
                    "    Min: {:.2}ms  Median: {:.2}ms  Mean: {:.2}ms  Max: {:.2}ms",
                    stats.min_ms, stats.median_ms, stats.mean_ms, stats.max_ms
                );
                println!("    StdDev: {:.2}ms", stats.std_dev_ms);
            }
            None => println!("  {}: no samples", m.name),
        }
    }

    match &entry.error {
        None => println!("  ✅ PASS"),
        Some(err) => println!("  ❌ FAIL: {}", err),
    }
}

/// Prints the pass/fail/skip counts for a run.
pub fn print_summary(report: &Report) {
    let skipped = report.experiments.iter().filter(|e| e.skipped).count();
    let failed = report.failures();
    let passed = report.experiments.len() - skipped - failed;

    println!("\n{}", "=".repeat(60));
    println!(
        "{} passed, {} failed, {} skipped",
        passed, failed, skipped
    );
}
