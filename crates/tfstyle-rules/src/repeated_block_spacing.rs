//! Rule limiting blank lines between repeated nested blocks.
//!
//! Repeated blocks such as several `network_interface` or `ingress` blocks
//! inside one resource read as a list and should stay close together.
//!
//! # Configuration
//!
//! - `max_blank_lines`: Longest allowed run of blank lines (default: 1)

use tfstyle_core::{
    BodyItem, Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity,
};

/// Rule id for repeated-block-spacing.
pub const ID: &str = "ST.004";

/// Rule name for repeated-block-spacing.
pub const NAME: &str = "repeated-block-spacing";

/// Limits blank lines between consecutive same-type nested blocks.
#[derive(Debug, Clone)]
pub struct RepeatedBlockSpacing {
    max_blank_lines: usize,
    severity: Severity,
}

impl Default for RepeatedBlockSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl RepeatedBlockSpacing {
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

/// Returns true when two adjacent body items are blocks of the same type.
pub(crate) fn is_repeated_pair(first: &BodyItem<'_>, second: &BodyItem<'_>) -> bool {
    matches!(
        (first, second),
        (BodyItem::Block(a), BodyItem::Block(b)) if a.keyword == b.keyword
    )
}

impl Rule for RepeatedBlockSpacing {
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
        "Limits blank lines between repeated nested blocks"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut out = Vec::new();
        for parent in file.all_blocks() {
            let items = parent.items();
            for pair in items.windows(2) {
                let (BodyItem::Block(prev), BodyItem::Block(next)) = (pair[0], pair[1]) else {
                    continue;
                };
                if prev.keyword != next.keyword {
                    continue;
                }
                let gap = file.blank_gap(prev.end_line, next.start_line);
                if gap.longest > self.max_blank_lines {
                    out.push(Diagnostic::new(
                        ID,
                        NAME,
                        self.severity,
                        ctx.location(next.start_line, next.depth * 2 + 1),
                        format!(
                            "{} consecutive blank lines between `{}` blocks (max {})",
                            gap.longest, next.keyword, self.max_blank_lines
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

    const NETWORKS: &str = r#"resource "google_compute_instance" "this" {
  network {
    name = "a"
  }



  network {
    name = "b"
  }
}
"#;

    #[test]
    fn three_blanks_with_threshold_two_reports_once() {
        let rule = RepeatedBlockSpacing::new().max_blank_lines(2);
        let found = run(&rule, NETWORKS);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line(), 8);
        assert_eq!(found[0].location.column, 3);
    }

    #[test]
    fn different_types_are_not_checked() {
        let src = "resource \"x\" \"y\" {\n  a {}\n\n\n\n  b {}\n}\n";
        assert!(run(&RepeatedBlockSpacing::new(), src).is_empty());
    }

    #[test]
    fn single_blank_passes() {
        let src = "resource \"x\" \"y\" {\n  ingress {}\n\n  ingress {}\n}\n";
        assert!(run(&RepeatedBlockSpacing::new(), src).is_empty());
    }
}
