//! Rule flagging version constraints without an upper bound.
//!
//! # Rationale
//!
//! `>= 4.0` accepts every future major release, so an unrelated `init` can
//! pull in breaking changes. A constraint is bounded once any clause uses
//! `<`, `<=`, `~>` or pins an exact version.
//!
//! # Checked constraints
//!
//! - `required_version` in `terraform` blocks
//! - provider versions in `required_providers`, object or legacy string form
//! - `version` in `module` blocks

use crate::common::find_key;
use tfstyle_core::{
    Attribute, Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity,
    Suggestion,
};

/// Rule id for permissive-version-constraint.
pub const ID: &str = "SC.003";

/// Rule name for permissive-version-constraint.
pub const NAME: &str = "permissive-version-constraint";

/// Flags lower-bound-only version constraints.
#[derive(Debug, Clone)]
pub struct PermissiveVersionConstraint {
    severity: Severity,
}

impl Default for PermissiveVersionConstraint {
    fn default() -> Self {
        Self::new()
    }
}

/// A constraint string and where its value starts.
struct Constraint {
    line: usize,
    column: usize,
    value: String,
}

impl PermissiveVersionConstraint {
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

    fn collect(ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Constraint>, RuleError> {
        let mut found = Vec::new();
        for block in &file.blocks {
            match block.keyword.as_str() {
                "terraform" => {
                    found.extend(block.attribute("required_version").and_then(literal));
                    for providers in block.children_named("required_providers") {
                        for entry in &providers.attributes {
                            if entry.is_block_valued {
                                let hit = find_key(ctx, entry.line, entry.end_line, "version")?;
                                found.extend(hit.and_then(|h| {
                                    h.string.map(|value| Constraint {
                                        line: h.line,
                                        column: h.value_column,
                                        value,
                                    })
                                }));
                            } else {
                                found.extend(literal(entry));
                            }
                        }
                    }
                }
                "module" => found.extend(block.attribute("version").and_then(literal)),
                _ => {}
            }
        }
        Ok(found)
    }
}

fn literal(attribute: &Attribute) -> Option<Constraint> {
    attribute.string_literal().map(|value| Constraint {
        line: attribute.line,
        column: attribute.equals_column + 2,
        value: value.to_string(),
    })
}

/// Returns true if `constraint` has a lower bound and no upper bound.
pub(crate) fn is_permissive(constraint: &str) -> bool {
    let clauses: Vec<&str> = constraint
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    let lower = clauses.iter().any(|c| c.starts_with('>'));
    let upper = clauses.iter().any(|c| {
        c.starts_with('<')
            || c.starts_with("~>")
            || c.starts_with('=')
            || c.starts_with(|ch: char| ch.is_ascii_digit())
    });
    lower && !upper
}

impl Rule for PermissiveVersionConstraint {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn description(&self) -> &'static str {
        "Bounds version constraints from above"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        Ok(Self::collect(ctx, file)?
            .into_iter()
            .filter(|c| is_permissive(&c.value))
            .map(|c| {
                Diagnostic::new(
                    ID,
                    NAME,
                    self.severity,
                    ctx.location(c.line, c.column),
                    format!("Version constraint \"{}\" has no upper bound", c.value),
                )
                .with_suggestion(Suggestion::new(
                    "Use a pessimistic constraint such as \"~> 5.0\" or add an upper bound",
                ))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;

    #[test]
    fn classification() {
        assert!(is_permissive(">= 1.0"));
        assert!(is_permissive("> 1.0"));
        assert!(!is_permissive(">= 1.0, < 2.0"));
        assert!(!is_permissive("~> 1.6"));
        assert!(!is_permissive("1.5.7"));
        assert!(!is_permissive("= 1.5.7"));
        assert!(!is_permissive(">= 1.0, <= 1.9"));
        assert!(!is_permissive(""));
    }

    #[test]
    fn finds_every_constraint_site() {
        let src = r#"terraform {
  required_version = ">= 1.3"

  required_providers {
    aws = {
      source  = "hashicorp/aws"
      version = ">= 4.0"
    }
    random = "> 3.0"
  }
}

module "vpc" {
  source  = "terraform-aws-modules/vpc/aws"
  version = ">= 5.0, < 6.0"
}
"#;
        let found = run(&PermissiveVersionConstraint::new(), src);
        let lines: Vec<usize> = found.iter().map(Diagnostic::line).collect();
        assert_eq!(lines, vec![2, 7, 9]);
        assert_eq!(found[0].location.column, 22);
        assert_eq!(found[1].location.column, 17);
    }
}
