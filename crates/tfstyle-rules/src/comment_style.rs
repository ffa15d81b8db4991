//! Rule preferring `#` comments over `//`. Disabled by default.

use tfstyle_core::{
    Category, CommentMarker, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity,
};

/// Rule id for comment-style.
pub const ID: &str = "DC.002";

/// Rule name for comment-style.
pub const NAME: &str = "comment-style";

/// Prefers `#` line comments.
#[derive(Debug, Clone)]
pub struct CommentStyle {
    severity: Severity,
}

impl Default for CommentStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentStyle {
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

impl Rule for CommentStyle {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Documentation
    }

    fn description(&self) -> &'static str {
        "Prefers `#` over `//` for line comments"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn default_enabled(&self) -> bool {
        false
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        Ok(file
            .comments
            .iter()
            .filter(|c| !c.inside_heredoc && c.marker == CommentMarker::DoubleSlash)
            .map(|c| {
                Diagnostic::new(
                    ID,
                    NAME,
                    self.severity,
                    ctx.location(c.line, c.column),
                    "Use `#` instead of `//` for comments",
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;

    #[test]
    fn flags_double_slash_only() {
        let found = run(&CommentStyle::new(), "# fine\n// not fine\n/* block */\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line(), 2);
    }
}
