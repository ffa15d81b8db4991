//! Core types for diagnostics and results.

use miette::SourceSpan;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Should be addressed, does not fail the run by default.
    Warning,
    /// Must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity `{other}`")),
        }
    }
}

/// Source location of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as supplied by the caller.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    #[serde(default, skip_serializing)]
    pub offset: usize,
    /// Length of the span in bytes.
    #[serde(default, skip_serializing)]
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A suggested fix, described in words. Files are never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single finding: a rule violation, a parse issue, or an internal fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable, category-prefixed rule id (e.g. "ST.001").
    pub rule_id: String,
    /// Rule name (e.g. "attribute-alignment").
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Primary location.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this diagnostic.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Line number shortcut.
    #[must_use]
    pub fn line(&self) -> usize {
        self.location.line
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.rule_id,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }

    /// Deterministic ordering key: file, line, column, rule id, message.
    fn sort_key(&self) -> (&PathBuf, usize, usize, &str, &str) {
        (
            &self.location.file,
            self.location.line,
            self.location.column,
            &self.rule_id,
            &self.message,
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.rule_id,
            self.message
        )
    }
}

/// Converts a [`Diagnostic`] to a miette diagnostic for rich display.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
pub struct DiagnosticReport {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Diagnostic> for DiagnosticReport {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: format!("[{}] {}", d.rule_id, d.message),
            help: d.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((d.location.offset, d.location.length)),
            label_message: d.rule.clone(),
        }
    }
}

/// Aggregated diagnostics across files.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics, sorted once [`LintResult::sort`] has run.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of files analyzed.
    pub files_checked: usize,
    /// Number of files not analyzed (unreadable or cancelled).
    pub files_skipped: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Checks if any diagnostics meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Returns diagnostics filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .collect()
    }

    /// Counts diagnostics as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        (errors, self.diagnostics.len() - errors)
    }

    /// Sorts diagnostics by file path, line, column, rule id, then message.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    /// Adds diagnostics from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.files_checked += other.files_checked;
        self.files_skipped += other.files_skipped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(file: &str, line: usize, id: &str, severity: Severity) -> Diagnostic {
        Diagnostic::new(
            id,
            "some-rule",
            severity,
            Location::new(file, line, 1),
            "message",
        )
    }

    #[test]
    fn format_includes_help() {
        let d = make("main.tf", 3, "ST.001", Severity::Warning)
            .with_suggestion(Suggestion::new("Align the equals sign"));
        let formatted = d.format();
        assert!(formatted.starts_with("ST.001 some-rule at main.tf:3:1"));
        assert!(formatted.contains("= help: Align the equals sign"));
    }

    #[test]
    fn display_is_compact() {
        let d = make("main.tf", 3, "ST.001", Severity::Error);
        assert_eq!(d.to_string(), "main.tf:3:1: error [ST.001] message");
    }

    #[test]
    fn sort_is_by_path_then_line_then_rule() {
        let mut result = LintResult::new();
        result.diagnostics = vec![
            make("b.tf", 1, "ST.001", Severity::Error),
            make("a.tf", 9, "DC.001", Severity::Error),
            make("a.tf", 2, "ST.002", Severity::Error),
            make("a.tf", 2, "DC.001", Severity::Error),
        ];
        result.sort();
        let order: Vec<(String, usize, &str)> = result
            .diagnostics
            .iter()
            .map(|d| {
                (
                    d.location.file.display().to_string(),
                    d.line(),
                    d.rule_id.as_str(),
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.tf".to_string(), 2, "DC.001"),
                ("a.tf".to_string(), 2, "ST.002"),
                ("a.tf".to_string(), 9, "DC.001"),
                ("b.tf".to_string(), 1, "ST.001"),
            ]
        );
    }

    #[test]
    fn counts_and_thresholds() {
        let mut result = LintResult::new();
        result.diagnostics.push(make("a.tf", 1, "ST.001", Severity::Warning));
        assert!(!result.has_errors());
        assert!(result.has_diagnostics_at(Severity::Warning));
        assert!(!result.has_diagnostics_at(Severity::Error));
        result.diagnostics.push(make("a.tf", 2, "SC.001", Severity::Error));
        assert_eq!(result.count_by_severity(), (1, 1));
        assert_eq!(result.by_severity(Severity::Error).len(), 1);
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("Warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert!("info".parse::<Severity>().is_err());
    }
}
