//! Rule requiring snake_case names for declared objects.
//!
//! | Block | Checked label |
//! |-------|---------------|
//! | `resource`, `data` | second (instance name) |
//! | `variable`, `output`, `module` | first |

use crate::common::is_snake_case;
use tfstyle_core::{Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity};

/// Rule id for snake-case-names.
pub const ID: &str = "ST.009";

/// Rule name for snake-case-names.
pub const NAME: &str = "snake-case-names";

const NAMED_LABEL: &[(&str, usize)] = &[
    ("resource", 1),
    ("data", 1),
    ("variable", 0),
    ("output", 0),
    ("module", 0),
];

/// Requires `^[a-z][a-z0-9_]*$` names.
#[derive(Debug, Clone)]
pub struct SnakeCaseNames {
    severity: Severity,
}

impl Default for SnakeCaseNames {
    fn default() -> Self {
        Self::new()
    }
}

impl SnakeCaseNames {
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

impl Rule for SnakeCaseNames {
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
        "Names resources, data sources, variables, outputs and modules in snake_case"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut out = Vec::new();
        for block in &file.blocks {
            let Some(&(_, index)) = NAMED_LABEL.iter().find(|(kw, _)| *kw == block.keyword) else {
                continue;
            };
            let Some(label) = block.labels.get(index) else {
                continue;
            };
            if !is_snake_case(&label.value) {
                out.push(Diagnostic::new(
                    ID,
                    NAME,
                    self.severity,
                    ctx.location(block.start_line, label.column),
                    format!(
                        "`{}` name `{}` is not snake_case",
                        block.keyword, label.value
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
    fn checks_the_right_label() {
        let src = "resource \"AwsThing\" \"web_1\" {}\n\nresource \"aws_instance\" \"Web\" {}\n\nvariable \"Region\" {}\n\nmodule \"vpc-main\" {}\n";
        let found = run(&SnakeCaseNames::new(), src);
        let lines: Vec<usize> = found.iter().map(Diagnostic::line).collect();
        assert_eq!(lines, vec![3, 5, 7]);
        assert_eq!(found[0].location.column, 25);
    }

    #[test]
    fn other_blocks_ignored() {
        let src = "provider \"AWS\" {}\n\nlocals {}\n";
        assert!(run(&SnakeCaseNames::new(), src).is_empty());
    }
}
