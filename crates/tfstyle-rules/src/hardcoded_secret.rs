//! Rule forbidding string literals in secret-named attributes.
//!
//! # Detected Patterns
//!
//! ```text
//! resource "aws_db_instance" "this" {
//!   password = "hunter2"          # flagged
//!   password = var.db_password    # fine
//!   password = "${var.prefix}-pw" # fine, interpolated
//! }
//! ```
//!
//! Top-level attributes (variable definition files) are not checked.
//!
//! # Configuration
//!
//! - `patterns`: Extra name fragments treated as secret (default: none)

use crate::common::is_secret_name;
use tfstyle_core::{
    Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity, Suggestion,
};

/// Rule id for hardcoded-secret.
pub const ID: &str = "SC.005";

/// Rule name for hardcoded-secret.
pub const NAME: &str = "hardcoded-secret";

/// Forbids literal secrets in configuration.
#[derive(Debug, Clone)]
pub struct HardcodedSecret {
    patterns: Vec<String>,
    severity: Severity,
}

impl Default for HardcodedSecret {
    fn default() -> Self {
        Self::new()
    }
}

impl HardcodedSecret {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            severity: Severity::Error,
        }
    }

    /// Adds name fragments treated as secret.
    #[must_use]
    pub fn patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for HardcodedSecret {
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
        "Keeps secrets out of string literals"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut out = Vec::new();
        for block in file.all_blocks() {
            for attribute in &block.attributes {
                if !is_secret_name(&attribute.name, &self.patterns) {
                    continue;
                }
                let Some(literal) = attribute.string_literal() else {
                    continue;
                };
                if literal.is_empty() || literal.contains("${") {
                    continue;
                }
                out.push(
                    Diagnostic::new(
                        ID,
                        NAME,
                        self.severity,
                        ctx.location(attribute.line, attribute.name_column),
                        format!("`{}` holds a hardcoded value", attribute.name),
                    )
                    .with_suggestion(Suggestion::new(
                        "Pass it in through a sensitive variable or a secret store",
                    )),
                );
            }
        }
        Ok(out)
    }
}
