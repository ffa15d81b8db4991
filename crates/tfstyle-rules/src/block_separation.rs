//! Rule requiring a blank line between top-level blocks.

use tfstyle_core::{Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity};

/// Rule id for block-separation.
pub const ID: &str = "ST.002";

/// Rule name for block-separation.
pub const NAME: &str = "block-separation";

/// Requires at least one blank line between sibling top-level blocks.
#[derive(Debug, Clone)]
pub struct BlockSeparation {
    severity: Severity,
}

impl Default for BlockSeparation {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockSeparation {
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

impl Rule for BlockSeparation {
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
        "Separates top-level blocks with a blank line"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        Ok(file
            .blocks
            .windows(2)
            .filter(|pair| file.blank_gap(pair[0].end_line, pair[1].start_line).total == 0)
            .map(|pair| {
                Diagnostic::new(
                    ID,
                    NAME,
                    self.severity,
                    ctx.location(pair[1].start_line, 1),
                    format!(
                        "Missing blank line between `{}` and `{}`",
                        pair[0].display_name(),
                        pair[1].display_name()
                    ),
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
    fn adjacent_blocks_report_at_second() {
        let src = "variable \"a\" {}\nvariable \"b\" {}\n";
        let found = run(&BlockSeparation::new(), src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line(), 2);
    }

    #[test]
    fn separated_blocks_pass() {
        let src = "variable \"a\" {}\n\nvariable \"b\" {\n  type = string\n}\n";
        assert!(run(&BlockSeparation::new(), src).is_empty());
    }

    #[test]
    fn comment_does_not_count_as_separation() {
        let src = "variable \"a\" {}\n# about b\nvariable \"b\" {}\n";
        assert_eq!(run(&BlockSeparation::new(), src).len(), 1);
    }

    #[test]
    fn nested_blocks_ignored() {
        let src = "resource \"x\" \"y\" {\n  a {}\n  b {}\n}\n";
        assert!(run(&BlockSeparation::new(), src).is_empty());
    }
}
