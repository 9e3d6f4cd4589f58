use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: config.{toml,yaml,yml,json} in . or ~/.cf-performance-tests)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log every cf invocation
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Benchmark the /v3/domains endpoints
    Domains(RunArgs),

    /// List the domains cases without running them
    List {
        /// per_page used in the large page case name
        #[arg(long, default_value_t = 500)]
        large_page_size: usize,
    },
}

/// Overrides for a benchmark run; unset flags keep the config value.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Only run cases whose name contains this string
    #[arg(short, long)]
    pub focus: Option<String>,

    /// Number of samples per case
    #[arg(short, long)]
    pub samples: Option<usize>,

    /// Upper bound on sampling time per case (e.g. "5m")
    #[arg(long)]
    pub sample_length: Option<String>,

    /// per_page for the large page case
    #[arg(long)]
    pub large_page_size: Option<usize>,

    /// Skip cases that delete resources
    #[arg(long)]
    pub skip_destructive: bool,

    /// Directory to write the JSON report to
    #[arg(long)]
    pub results_folder: Option<PathBuf>,

    /// Print the report as JSON instead of the per-case summary
    #[arg(long)]
    pub json: bool,
}
