//! File discovery and role classification.

use glob::Pattern;
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};
use tfstyle_core::{AnalyzerConfig, FileInput, FileRole};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while collecting files.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// An include or exclude pattern is not a valid glob.
    #[error("Invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },

    /// A path given on the command line does not exist.
    #[error("Path not found: {}", .0.display())]
    MissingPath(PathBuf),
}

/// Classifies a file by its name and location.
///
/// Standard module file names win. Otherwise `*.tftest.hcl` files and
/// files below an `examples/` or `tests/` directory are samples.
#[must_use]
pub fn classify(path: &Path) -> FileRole {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    match name {
        "main.tf" => return FileRole::Main,
        "variables.tf" => return FileRole::Variables,
        "outputs.tf" => return FileRole::Outputs,
        "providers.tf" => return FileRole::Providers,
        "versions.tf" | "terraform.tf" => return FileRole::Versions,
        "locals.tf" => return FileRole::Locals,
        _ => {}
    }
    if name.ends_with(".tftest.hcl") {
        return FileRole::Test;
    }

    let dirs = path
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        });
    for dir in dirs {
        match dir {
            "examples" => return FileRole::Example,
            "tests" => return FileRole::Test,
            _ => {}
        }
    }
    FileRole::Other
}

/// Include and exclude globs, matched against paths relative to the walk root.
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    respect_gitignore: bool,
}

impl FileFilter {
    /// Compiles the analyzer settings plus extra exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Pattern`] for an invalid glob.
    pub fn new(settings: &AnalyzerConfig, extra_exclude: &[String]) -> Result<Self, DiscoveryError> {
        Ok(Self {
            include: compile(&settings.include)?,
            exclude: compile(settings.exclude.iter().chain(extra_exclude))?,
            respect_gitignore: settings.respect_gitignore,
        })
    }

    /// Returns true if `relative` is selected.
    #[must_use]
    pub fn matches(&self, relative: &Path) -> bool {
        let included = self.include.iter().any(|p| p.matches_path(relative));
        included && !self.is_excluded(relative)
    }

    fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

fn compile<'a>(patterns: impl IntoIterator<Item = &'a String>) -> Result<Vec<Pattern>, DiscoveryError> {
    patterns
        .into_iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| DiscoveryError::Pattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Collects the files to analyze below each path.
///
/// Files named directly are always analyzed. Directories are walked,
/// honoring `.gitignore` when configured. The result is sorted and free of
/// duplicates.
///
/// # Errors
///
/// Returns [`DiscoveryError::MissingPath`] if a path does not exist.
pub fn discover(paths: &[PathBuf], filter: &FileFilter) -> Result<Vec<FileInput>, DiscoveryError> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_file() {
            inputs.push(FileInput::new(path, Some(classify(path))));
        } else if path.is_dir() {
            walk(path, filter, &mut inputs);
        } else {
            return Err(DiscoveryError::MissingPath(path.clone()));
        }
    }

    inputs.sort_by(|a, b| a.path.cmp(&b.path));
    inputs.dedup_by(|a, b| a.path == b.path);
    debug!("Discovered {} file(s)", inputs.len());
    Ok(inputs)
}

fn walk(root: &Path, filter: &FileFilter, inputs: &mut Vec<FileInput>) {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(filter.respect_gitignore)
        .git_exclude(filter.respect_gitignore)
        .require_git(false);

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if !filter.matches(relative) {
            continue;
        }
        inputs.push(FileInput::new(path, Some(classify(relative))));
    }
}
