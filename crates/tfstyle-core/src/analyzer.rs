//! Core analyzer for orchestrating lint execution.

use crate::context::{FileContext, FileRole};
use crate::model::ParsedFile;
use crate::registry::{Registry, RuleSelection};
use crate::types::{Diagnostic, LintResult, Severity};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Reserved id for a file that could not be read.
pub const UNREADABLE_FILE_ID: &str = "FS.001";
/// Reserved name for a file that could not be read.
pub const UNREADABLE_FILE_NAME: &str = "unreadable-file";

/// Errors that can occur while setting up analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A file queued for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    /// Path to read.
    pub path: PathBuf,
    /// Role assigned by the caller.
    pub role: Option<FileRole>,
}

impl FileInput {
    /// Creates a new input.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, role: Option<FileRole>) -> Self {
        Self {
            path: path.into(),
            role,
        }
    }
}

/// Shared flag that stops files from starting.
///
/// Files already being analyzed run to completion.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    registry: Option<Arc<Registry>>,
    selection: Option<RuleSelection>,
    parallelism: Option<usize>,
    cancellation: Option<CancellationToken>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule catalog.
    #[must_use]
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets which rules run (default: the registry's defaults).
    #[must_use]
    pub fn selection(mut self, selection: RuleSelection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Sets the number of worker threads (default: rayon's choice).
    #[must_use]
    pub fn parallelism(mut self, threads: Option<usize>) -> Self {
        self.parallelism = threads;
        self
    }

    /// Shares a cancellation token with the caller.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be created.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let registry = self.registry.unwrap_or_default();
        let selection = self
            .selection
            .unwrap_or_else(|| registry.default_selection());

        let mut pool = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("tfstyle-{i}"));
        if let Some(threads) = self.parallelism.filter(|&n| n > 0) {
            pool = pool.num_threads(threads);
        }

        Ok(Analyzer {
            registry,
            selection,
            pool: pool.build()?,
            cancellation: self.cancellation.unwrap_or_default(),
        })
    }
}

/// Lints one file's contents against `registry`.
///
/// Structural problems are reported as `PS.*` diagnostics and analysis
/// continues on whatever structure was recovered. The result is sorted.
#[must_use]
pub fn check_source(
    registry: &Registry,
    selection: &RuleSelection,
    path: &Path,
    content: &str,
    role: Option<FileRole>,
) -> Vec<Diagnostic> {
    let file = ParsedFile::parse(content);
    let ctx = FileContext::new(path, content, role, &file.lines);

    if file.partial {
        debug!("{}: partial structure ({} issue(s))", path.display(), file.issues.len());
    }

    let mut diagnostics: Vec<Diagnostic> = file
        .issues
        .iter()
        .map(|issue| {
            Diagnostic::new(
                issue.rule_id(),
                issue.rule_name(),
                Severity::Error,
                ctx.location(issue.line(), 1),
                issue.message(),
            )
        })
        .collect();
    diagnostics.extend(registry.evaluate(&ctx, &file, selection));

    let mut result = LintResult {
        diagnostics,
        ..LintResult::default()
    };
    result.sort();
    result.diagnostics
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    registry: Arc<Registry>,
    selection: RuleSelection,
    pool: rayon::ThreadPool,
    cancellation: CancellationToken,
}

enum FileOutcome {
    Checked(Vec<Diagnostic>),
    Unreadable(Diagnostic),
    Cancelled,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of enabled rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.registry
            .rules()
            .filter(|r| self.selection.is_enabled(r.id()))
            .count()
    }

    /// Returns the shared cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Lints one file's contents with this analyzer's rules.
    ///
    /// See [`check_source`].
    #[must_use]
    pub fn lint_source(&self, path: &Path, content: &str, role: Option<FileRole>) -> Vec<Diagnostic> {
        check_source(&self.registry, &self.selection, path, content, role)
    }

    /// Reads and lints every input on the worker pool.
    ///
    /// Unreadable files yield an `FS.001` diagnostic and count as skipped,
    /// as do files not yet started when cancellation is requested.
    #[must_use]
    pub fn analyze(&self, inputs: &[FileInput]) -> LintResult {
        info!("Starting analysis of {} file(s)", inputs.len());

        let outcomes: Vec<FileOutcome> = self
            .pool
            .install(|| inputs.par_iter().map(|input| self.analyze_file(input)).collect());

        let mut result = LintResult::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Checked(diagnostics) => {
                    result.diagnostics.extend(diagnostics);
                    result.files_checked += 1;
                }
                FileOutcome::Unreadable(diagnostic) => {
                    result.diagnostics.push(diagnostic);
                    result.files_skipped += 1;
                }
                FileOutcome::Cancelled => result.files_skipped += 1,
            }
        }
        result.sort();

        if self.cancellation.is_cancelled() {
            warn!("Analysis cancelled; {} file(s) skipped", result.files_skipped);
        }
        info!(
            "Analysis complete: {} diagnostic(s) in {} file(s)",
            result.diagnostics.len(),
            result.files_checked
        );
        result
    }

    fn analyze_file(&self, input: &FileInput) -> FileOutcome {
        if self.cancellation.is_cancelled() {
            debug!("Cancelled before: {}", input.path.display());
            return FileOutcome::Cancelled;
        }

        debug!("Analyzing: {}", input.path.display());
        match std::fs::read_to_string(&input.path) {
            Ok(content) => FileOutcome::Checked(self.lint_source(&input.path, &content, input.role)),
            Err(err) => {
                warn!("Failed to read {}: {}", input.path.display(), err);
                FileOutcome::Unreadable(Diagnostic::new(
                    UNREADABLE_FILE_ID,
                    UNREADABLE_FILE_NAME,
                    Severity::Error,
                    crate::types::Location::new(&input.path, 1, 1),
                    format!("Failed to read file: {err}"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let analyzer = Analyzer::builder()
            .build()
            .expect("Failed to build analyzer");
        assert_eq!(analyzer.rule_count(), 0);
        assert!(!analyzer.cancellation().is_cancelled());
    }

    #[test]
    fn structural_issues_become_errors() {
        let analyzer = Analyzer::builder().parallelism(Some(1)).build().unwrap();
        let diagnostics = analyzer.lint_source(Path::new("main.tf"), "x = <<EOF\nbody\n", None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "PS.001");
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].line(), 1);
    }

    #[test]
    fn missing_file_is_skipped() {
        let analyzer = Analyzer::builder().build().unwrap();
        let result = analyzer.analyze(&[FileInput::new("/definitely/not/here.tf", None)]);
        assert_eq!(result.files_checked, 0);
        assert_eq!(result.files_skipped, 1);
        assert_eq!(result.diagnostics[0].rule_id, UNREADABLE_FILE_ID);
    }

    #[test]
    fn cancelled_before_start_skips_everything() {
        let token = CancellationToken::new();
        let analyzer = Analyzer::builder()
            .cancellation(token.clone())
            .build()
            .unwrap();
        token.cancel();
        let result = analyzer.analyze(&[
            FileInput::new("a.tf", None),
            FileInput::new("b.tf", None),
        ]);
        assert_eq!(result.files_skipped, 2);
        assert!(result.diagnostics.is_empty());
    }
}
