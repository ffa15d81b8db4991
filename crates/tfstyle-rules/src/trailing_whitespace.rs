//! Rule forbidding trailing whitespace. Heredoc bodies are exempt.

use tfstyle_core::{Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity};

/// Rule id for trailing-whitespace.
pub const ID: &str = "ST.008";

/// Rule name for trailing-whitespace.
pub const NAME: &str = "trailing-whitespace";

/// Forbids trailing spaces and tabs.
#[derive(Debug, Clone)]
pub struct TrailingWhitespace {
    severity: Severity,
}

impl Default for TrailingWhitespace {
    fn default() -> Self {
        Self::new()
    }
}

impl TrailingWhitespace {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for TrailingWhitespace {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Style
    }

    fn description(&self) -> &'static str {
        "Forbids trailing whitespace outside heredocs"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        Ok(file
            .lines
            .iter()
            .filter(|line| !file.in_heredoc(line.index))
            .filter(|line| line.text.ends_with(&[' ', '\t'][..]))
            .map(|line| {
                let column = line.text.trim_end_matches(&[' ', '\t'][..]).chars().count() + 1;
                Diagnostic::new(
                    ID,
                    NAME,
                    self.severity,
                    ctx.location(line.index, column),
                    "Trailing whitespace",
                )
            })
            .collect())
    }
}
