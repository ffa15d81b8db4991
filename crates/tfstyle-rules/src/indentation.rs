//! Rule enforcing two-space indentation per nesting level.
//!
//! Checked lines are block headers, block closing braces, and the first
//! line of each attribute. Continuation lines of multi-line expressions and
//! heredoc bodies are free-form.

use tfstyle_core::{
    Category, Diagnostic, FileContext, Indentation, ParsedFile, Rule, RuleError, Severity,
    SpanKind,
};

/// Rule id for indentation.
pub const ID: &str = "ST.006";

/// Rule name for indentation.
pub const NAME: &str = "indentation";

/// Spaces per nesting level.
const INDENT: usize = 2;

/// Enforces two spaces per nesting level.
#[derive(Debug, Clone)]
pub struct IndentationRule {
    severity: Severity,
}

impl Default for IndentationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentationRule {
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

    fn check_line(
        &self,
        ctx: &FileContext,
        line: usize,
        depth: usize,
    ) -> Result<Option<Diagnostic>, RuleError> {
        let source = ctx.line(line).ok_or_else(|| RuleError::missing_line(line))?;
        let expected = depth * INDENT;
        let message = match source.indentation {
            Indentation::Tabs(_) => "Indent with spaces, not tabs".to_string(),
            Indentation::Mixed => "Indentation mixes tabs and spaces".to_string(),
            Indentation::None if expected == 0 => return Ok(None),
            Indentation::Spaces(n) if n == expected => return Ok(None),
            Indentation::None => format!("Expected {expected} spaces of indentation, found 0"),
            Indentation::Spaces(n) => {
                format!("Expected {expected} spaces of indentation, found {n}")
            }
        };
        Ok(Some(Diagnostic::new(
            ID,
            NAME,
            self.severity,
            ctx.location(line, 1),
            message,
        )))
    }
}

impl Rule for IndentationRule {
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
        "Indents two spaces per nesting level"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut checks: Vec<(usize, usize)> = file
            .attributes
            .iter()
            .map(|a| (a.line, a.depth))
            .collect();

        for block in file.all_blocks() {
            checks.push((block.start_line, block.depth));
            if !block.inline && file.line_kind(block.end_line) == Some(SpanKind::BlockClose) {
                checks.push((block.end_line, block.depth));
            }
            checks.extend(block.attributes.iter().map(|a| (a.line, a.depth)));
        }

        checks.sort_unstable();
        checks.dedup_by_key(|(line, _)| *line);

        let mut out = Vec::new();
        for (line, depth) in checks {
            out.extend(self.check_line(ctx, line, depth)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;

    #[test]
    fn well_indented_passes() {
        let src = "resource \"x\" \"y\" {\n  name = \"a\"\n  tags = {\n      free = \"form\"\n  }\n\n  lifecycle {\n    ignore_changes = []\n  }\n}\n";
        assert!(run(&IndentationRule::new(), src).is_empty());
    }

    #[test]
    fn wrong_width_reported() {
        let src = "locals {\n    a = 1\n}\n";
        let found = run(&IndentationRule::new(), src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line(), 2);
        assert!(found[0].message.contains("found 4"));
    }

    #[test]
    fn tabs_and_mixed_reported() {
        let src = "locals {\n\ta = 1\n \tb = 2\n}\n";
        let found = run(&IndentationRule::new(), src);
        assert_eq!(found.len(), 2);
        assert!(found[0].message.contains("tabs"));
        assert!(found[1].message.contains("mixes"));
    }

    #[test]
    fn closing_brace_checked() {
        let src = "locals {\n  a = 1\n  }\n";
        let found = run(&IndentationRule::new(), src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line(), 3);
    }

    #[test]
    fn unclosed_block_skips_close_line() {
        let src = "locals {\n  a = 1\n";
        assert!(run(&IndentationRule::new(), src).is_empty());
    }
}
