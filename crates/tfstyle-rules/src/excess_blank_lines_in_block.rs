//! Rule limiting blank lines between items inside a block.
//!
//! Pairs of same-type nested blocks are left to `repeated-block-spacing`.
//!
//! # Configuration
//!
//! - `max_blank_lines`: Longest allowed run of blank lines (default: 1)

use crate::repeated_block_spacing::is_repeated_pair;
use tfstyle_core::{Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity};

/// Rule id for excess-blank-lines-in-block.
pub const ID: &str = "ST.005";

/// Rule name for excess-blank-lines-in-block.
pub const NAME: &str = "excess-blank-lines-in-block";

/// Limits consecutive blank lines between items of a block body.
#[derive(Debug, Clone)]
pub struct ExcessBlankLinesInBlock {
    max_blank_lines: usize,
    severity: Severity,
}

impl Default for ExcessBlankLinesInBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcessBlankLinesInBlock {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_blank_lines: 1,
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

impl Rule for ExcessBlankLinesInBlock {
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
        "Limits consecutive blank lines inside a block"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut out = Vec::new();
        for parent in file.all_blocks() {
            let items = parent.items();
            for pair in items.windows(2) {
                if is_repeated_pair(&pair[0], &pair[1]) {
                    continue;
                }
                let gap = file.blank_gap(pair[0].end_line(), pair[1].start_line());
                if gap.longest > self.max_blank_lines {
                    out.push(Diagnostic::new(
                        ID,
                        NAME,
                        self.severity,
                        ctx.location(pair[1].start_line(), 1),
                        format!(
                            "{} consecutive blank lines inside `{}` (max {})",
                            gap.longest,
                            parent.display_name(),
                            self.max_blank_lines
                        ),
                    ));
                }
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
    fn attribute_gap_reported() {
        let src = "locals {\n  a = 1\n\n\n  b = 2\n}\n";
        let found = run(&ExcessBlankLinesInBlock::new(), src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line(), 5);
    }

    #[test]
    fn repeated_blocks_left_alone() {
        let src = "resource \"x\" \"y\" {\n  ingress {}\n\n\n  ingress {}\n}\n";
        assert!(run(&ExcessBlankLinesInBlock::new(), src).is_empty());
    }

    #[test]
    fn mixed_items_checked() {
        let src = "resource \"x\" \"y\" {\n  name = \"a\"\n\n\n  lifecycle {}\n}\n";
        assert_eq!(run(&ExcessBlankLinesInBlock::new(), src).len(), 1);
    }

    #[test]
    fn blank_before_closing_brace_not_counted() {
        let src = "locals {\n  a = 1\n\n\n}\n";
        assert!(run(&ExcessBlankLinesInBlock::new(), src).is_empty());
    }
}
