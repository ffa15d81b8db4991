//! Rule requiring a single space after `#` or `//`.
//!
//! Accepted: `# text`, a bare `#`, and divider lines made only of the
//! marker character (`#####`). Comment-looking lines inside heredocs are
//! string content and are skipped.

use tfstyle_core::{
    Category, Comment, CommentMarker, Diagnostic, FileContext, ParsedFile, Rule, RuleError,
    Severity, Suggestion,
};

/// Rule id for comment-format.
pub const ID: &str = "DC.001";

/// Rule name for comment-format.
pub const NAME: &str = "comment-format";

/// Requires exactly one space between the comment marker and the text.
#[derive(Debug, Clone)]
pub struct CommentFormat {
    severity: Severity,
}

impl Default for CommentFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentFormat {
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

fn is_well_formed(comment: &Comment) -> bool {
    let text = comment.text.as_str();
    if text.trim().is_empty() {
        return true;
    }
    let divider = match comment.marker {
        CommentMarker::DoubleSlash => '/',
        _ => '#',
    };
    if text.chars().all(|c| c == divider) {
        return true;
    }
    text.strip_prefix(' ')
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !c.is_whitespace())
}

impl Rule for CommentFormat {
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
        "Puts exactly one space after the comment marker"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        Ok(file
            .comments
            .iter()
            .filter(|c| !c.inside_heredoc)
            .filter(|c| matches!(c.marker, CommentMarker::Hash | CommentMarker::DoubleSlash))
            .filter(|c| !is_well_formed(c))
            .map(|c| {
                let marker = c.marker.as_str();
                Diagnostic::new(
                    ID,
                    NAME,
                    self.severity,
                    ctx.location(c.line, c.column),
                    format!("Expected exactly one space after `{marker}`"),
                )
                .with_suggestion(Suggestion::new(format!(
                    "{marker} {}",
                    c.text.trim_start()
                )))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;

    fn count(src: &str) -> usize {
        run(&CommentFormat::new(), src).len()
    }

    #[test]
    fn spacing_scenarios() {
        assert_eq!(count("#comment\n"), 1);
        assert_eq!(count("# comment\n"), 0);
        assert_eq!(count("#  comment\n"), 1);
        assert_eq!(count("#\n"), 0);
    }

    #[test]
    fn double_slash_and_dividers() {
        assert_eq!(count("//comment\n"), 1);
        assert_eq!(count("// comment\n"), 0);
        assert_eq!(count("##########\n"), 0);
        assert_eq!(count("//////////\n"), 0);
        assert_eq!(count("#\tcomment\n"), 1);
    }

    #[test]
    fn heredoc_lines_skipped() {
        assert_eq!(count("x = <<EOF\n#!/bin/sh\n#nope\nEOF\n"), 0);
    }

    #[test]
    fn suggestion_normalizes_spacing() {
        let found = run(&CommentFormat::new(), "  #   indented\n");
        assert_eq!(found[0].location.column, 3);
        assert_eq!(
            found[0].suggestion.as_ref().map(|s| s.message.as_str()),
            Some("# indented")
        );
    }
}
