//! Latency benchmarks for Cloud Foundry API endpoints.
//!
//! Every request goes through `cf curl`, so the numbers include CLI start-up
//! and authentication overhead, the same as a user driving the CLI would see.
//! Cases run sequentially as an admin and as a regular user:
//! - Listing domains, with default and large page sizes
//! - Listing an organization's domains
//! - Showing, updating and deleting individual domains

mod benchmarks;
mod cli;
mod utils;

use anyhow::Context;
use cf_perf_core::config::parse_duration;
use cf_perf_core::{CfCli, Config, SuiteSetup};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use benchmarks::domains::DomainCase;
use benchmarks::Selection;
use cli::{Cli, Commands, RunArgs};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Layers command-line overrides on top of the loaded config.
fn apply_run_args(mut config: Config, args: &RunArgs) -> anyhow::Result<Config> {
    if let Some(samples) = args.samples {
        config.samples = samples;
    }
    if let Some(length) = &args.sample_length {
        config.sample_length = parse_duration("sample_length", length)?;
    }
    if let Some(size) = args.large_page_size {
        config.large_page_size = size;
    }
    if let Some(focus) = &args.focus {
        config.focus = Some(focus.clone());
    }
    if args.skip_destructive {
        config.skip_destructive = true;
    }
    if let Some(folder) = &args.results_folder {
        config.results_folder = Some(folder.clone());
    }
    config.validate()?;
    Ok(config)
}

async fn run_domains(config: Config, json: bool) -> anyhow::Result<ExitCode> {
    let selection = Selection {
        focus: config.focus.clone(),
        skip_destructive: config.skip_destructive,
    };
    let results_folder = config.results_folder.clone();
    let prefix = config.name_prefix.clone();

    let cli = CfCli::new(&config.cf_binary);
    let mut suite = SuiteSetup::setup(cli, config)
        .await
        .context("Suite setup failed")?;

    let report = benchmarks::run_domains(&suite, &selection, json).await;
    suite.teardown().await;

    if json {
        println!("{}", report.to_json()?);
    } else {
        utils::print_summary(&report);
    }

    if let Some(folder) = results_folder {
        report
            .write_to(&folder, &prefix)
            .with_context(|| format!("Failed to write report to {}", folder.display()))?;
    }

    if report.failures() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::List { large_page_size } => {
            for case in DomainCase::all() {
                let marker = if case.destructive() { " (destructive)" } else { "" };
                println!("{}{}", case.name(large_page_size), marker);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Domains(args) => {
            let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
            let config = apply_run_args(config, &args)?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start runtime")?;
            runtime.block_on(run_domains(config, args.json))
        }
    }
}
