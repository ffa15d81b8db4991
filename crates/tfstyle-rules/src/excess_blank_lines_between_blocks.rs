//! Rule limiting blank lines between top-level blocks.
//!
//! # Configuration
//!
//! - `max_blank_lines`: Longest allowed run of blank lines (default: 1)

use tfstyle_core::{Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity};

/// Rule id for excess-blank-lines-between-blocks.
pub const ID: &str = "ST.003";

/// Rule name for excess-blank-lines-between-blocks.
pub const NAME: &str = "excess-blank-lines-between-blocks";

/// Default for `max_blank_lines`.
pub const DEFAULT_MAX_BLANK_LINES: usize = 1;

/// Limits consecutive blank lines between top-level blocks.
#[derive(Debug, Clone)]
pub struct ExcessBlankLinesBetweenBlocks {
    max_blank_lines: usize,
    severity: Severity,
}

impl Default for ExcessBlankLinesBetweenBlocks {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcessBlankLinesBetweenBlocks {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_blank_lines: DEFAULT_MAX_BLANK_LINES,
            severity: Severity::Warning,
        }
    }

    /// Sets the longest allowed blank run.
    #[must_use]
    pub fn max_blank_lines(mut self, max: usize) -> Self {
        self.max_blank_lines = max;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for ExcessBlankLinesBetweenBlocks {
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
        "Limits consecutive blank lines between top-level blocks"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut out = Vec::new();
        for pair in file.blocks.windows(2) {
            let gap = file.blank_gap(pair[0].end_line, pair[1].start_line);
            if gap.longest > self.max_blank_lines {
                out.push(Diagnostic::new(
                    ID,
                    NAME,
                    self.severity,
                    ctx.location(pair[1].start_line, 1),
                    format!(
                        "{} consecutive blank lines before `{}` (max {})",
                        gap.longest,
                        pair[1].display_name(),
                        self.max_blank_lines
                    ),
                ));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;

    #[test]
    fn two_blank_lines_exceed_default() {
        let src = "locals {}\n\n\nlocals {}\n\nlocals {}\n";
        let found = run(&ExcessBlankLinesBetweenBlocks::new(), src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line(), 4);
        assert!(found[0].message.starts_with("2 consecutive"));
    }

    #[test]
    fn threshold_is_configurable() {
        let src = "locals {}\n\n\nlocals {}\n";
        let rule = ExcessBlankLinesBetweenBlocks::new().max_blank_lines(2);
        assert!(run(&rule, src).is_empty());
    }

    #[test]
    fn comment_splits_blank_runs() {
        let src = "locals {}\n\n# next\n\nlocals {}\n";
        assert!(run(&ExcessBlankLinesBetweenBlocks::new(), src).is_empty());
    }
}
