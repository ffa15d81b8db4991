//! Check command implementation.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tfstyle::{run_check, CancellationToken, CheckOptions};
use tracing::{info, warn};

use crate::config_resolver;
use crate::OutputFormat;

/// Arguments of `tfstyle check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Files or directories to analyze
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Only run specific rules (comma-separated ids or names)
    #[arg(long, value_delimiter = ',')]
    pub rules: Vec<String>,

    /// Preset to start from, overriding the config file
    #[arg(long, value_parser = ["recommended", "strict", "minimal"])]
    pub preset: Option<String>,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Stop starting new files after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Runs the check command.
pub fn run(args: CheckArgs, config_path: Option<&Path>) -> Result<()> {
    let project = config_resolver::project_dir(&args.paths);
    let source = config_resolver::resolve(&project, config_path);
    let config = config_resolver::load(&source)?;

    let token = CancellationToken::new();
    if let Some(secs) = args.timeout {
        start_deadline(token.clone(), Duration::from_secs(secs));
    }

    let options = CheckOptions {
        paths: args.paths,
        preset: args.preset,
        rules: args.rules.iter().map(|r| r.trim().to_string()).collect(),
        exclude: args.exclude,
        cancellation: Some(token),
    };

    info!("Checking {:?}", options.paths);
    let result = run_check(&config, &options).context("Check failed")?;

    super::output::print(&result, args.format)?;

    if result.has_diagnostics_at(config.fail_threshold()) {
        std::process::exit(1);
    }

    Ok(())
}

fn start_deadline(token: CancellationToken, after: Duration) {
    std::thread::spawn(move || {
        std::thread::sleep(after);
        warn!("Timeout of {}s reached; no further files will start", after.as_secs());
        token.cancel();
    });
}
