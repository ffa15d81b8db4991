//! Project runner: config in, sorted diagnostics out.

use crate::discovery::{discover, DiscoveryError, FileFilter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tfstyle_core::{
    Analyzer, AnalyzerError, CancellationToken, Config, ConfigError, LintResult, RegistryError,
};
use tfstyle_rules::{registry, selection_for};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that stop a run before analysis starts.
#[derive(Debug, Error)]
pub enum RunError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The rule catalog could not be assembled.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// File collection failed.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The analyzer could not be built.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

/// Project config file names, checked in order.
pub const CONFIG_FILES: &[&str] = &["tfstyle.toml", ".tfstyle.toml"];

/// Returns the first project config file present in `dir`.
#[must_use]
pub fn find_project_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Loads the project config from `dir`, or defaults when there is none.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_project_config(dir: &Path) -> Result<Config, ConfigError> {
    match find_project_config(dir) {
        Some(path) => {
            debug!("Loading config: {}", path.display());
            Config::from_file(&path)
        }
        None => Ok(Config::default()),
    }
}

/// Options layered over the configuration file for one run.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Files or directories to check. Empty means the configured root.
    pub paths: Vec<PathBuf>,
    /// Preset overriding the configured one.
    pub preset: Option<String>,
    /// When non-empty, only these rules (ids or names) run.
    pub rules: Vec<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Token that stops files from starting.
    pub cancellation: Option<CancellationToken>,
}

/// Checks a project.
///
/// # Errors
///
/// Returns an error if the configuration, file patterns or paths are
/// invalid. Problems inside individual files are reported as diagnostics.
pub fn run_check(config: &Config, options: &CheckOptions) -> Result<LintResult, RunError> {
    let mut config = config.clone();
    if let Some(preset) = &options.preset {
        config.preset = Some(preset.clone());
    }

    let registry = registry(&config)?;
    let mut selection = selection_for(&config, &registry)?;
    if !options.rules.is_empty() {
        let keys: Vec<&str> = options.rules.iter().map(String::as_str).collect();
        for unknown in selection.restrict_to(&registry, &keys) {
            warn!("Unknown rule: {}", unknown);
        }
    }

    let paths = if options.paths.is_empty() {
        vec![config.analyzer.root.clone()]
    } else {
        options.paths.clone()
    };
    let filter = FileFilter::new(&config.analyzer, &options.exclude)?;
    let inputs = discover(&paths, &filter)?;

    let mut builder = Analyzer::builder()
        .registry(Arc::new(registry))
        .selection(selection)
        .parallelism(config.analyzer.parallelism);
    if let Some(token) = &options.cancellation {
        builder = builder.cancellation(token.clone());
    }
    let analyzer = builder.build()?;

    info!(
        "Checking {} file(s) with {} rule(s)",
        inputs.len(),
        analyzer.rule_count()
    );
    Ok(analyzer.analyze(&inputs))
}
