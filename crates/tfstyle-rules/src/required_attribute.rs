//! Rules requiring an attribute on every top-level block of a kind.
//!
//! | Id | Block | Attribute |
//! |----|-------|-----------|
//! | IO.003 | `variable` | `type` |
//! | DC.003 | `variable` | `description` (non-empty) |
//! | DC.004 | `output` | `description` (non-empty) |
//! | SC.001 | `terraform` | `required_version` |

use tfstyle_core::{
    Block, Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity, Suggestion,
};

/// Rule id for variable-type.
pub const VARIABLE_TYPE_ID: &str = "IO.003";
/// Rule id for variable-description.
pub const VARIABLE_DESCRIPTION_ID: &str = "DC.003";
/// Rule id for output-description.
pub const OUTPUT_DESCRIPTION_ID: &str = "DC.004";
/// Rule id for terraform-required-version.
pub const REQUIRED_VERSION_ID: &str = "SC.001";

/// Requires `attribute` on every top-level `keyword` block.
#[derive(Debug, Clone)]
pub struct RequiredAttribute {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: Category,
    keyword: &'static str,
    attribute: &'static str,
    non_empty: bool,
    severity: Severity,
}

impl RequiredAttribute {
    /// `variable` blocks declare `type`.
    #[must_use]
    pub fn variable_type() -> Self {
        Self {
            id: VARIABLE_TYPE_ID,
            name: "variable-type",
            description: "Declares a type for every variable",
            category: Category::InputOutput,
            keyword: "variable",
            attribute: "type",
            non_empty: false,
            severity: Severity::Warning,
        }
    }

    /// `variable` blocks carry a non-empty `description`.
    #[must_use]
    pub fn variable_description() -> Self {
        Self {
            id: VARIABLE_DESCRIPTION_ID,
            name: "variable-description",
            description: "Describes every variable",
            category: Category::Documentation,
            keyword: "variable",
            attribute: "description",
            non_empty: true,
            severity: Severity::Warning,
        }
    }

    /// `output` blocks carry a non-empty `description`.
    #[must_use]
    pub fn output_description() -> Self {
        Self {
            id: OUTPUT_DESCRIPTION_ID,
            name: "output-description",
            description: "Describes every output",
            category: Category::Documentation,
            keyword: "output",
            attribute: "description",
            non_empty: true,
            severity: Severity::Warning,
        }
    }

    /// `terraform` blocks pin `required_version`.
    #[must_use]
    pub fn terraform_required_version() -> Self {
        Self {
            id: REQUIRED_VERSION_ID,
            name: "terraform-required-version",
            description: "Pins the Terraform version in terraform blocks",
            category: Category::Security,
            keyword: "terraform",
            attribute: "required_version",
            non_empty: false,
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn problem(&self, block: &Block) -> Option<String> {
        match block.attribute(self.attribute) {
            None => Some(format!(
                "`{}` has no `{}`",
                block.display_name(),
                self.attribute
            )),
            Some(attr) if self.non_empty && attr.string_literal().is_some_and(|s| s.trim().is_empty()) => {
                Some(format!("`{}` has an empty `{}`", block.display_name(), self.attribute))
            }
            Some(_) => None,
        }
    }
}

impl Rule for RequiredAttribute {
    fn id(&self) -> &'static str {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn category(&self) -> Category {
        self.category
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        Ok(file
            .blocks_named(self.keyword)
            .filter_map(|block| self.problem(block).map(|message| (block, message)))
            .map(|(block, message)| {
                Diagnostic::new(
                    self.id,
                    self.name,
                    self.severity,
                    ctx.location(block.start_line, 1),
                    message,
                )
                .with_suggestion(Suggestion::new(format!("Add `{} = ...`", self.attribute)))
            })
            .collect())
    }
}
