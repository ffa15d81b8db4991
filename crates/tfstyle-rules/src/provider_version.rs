//! Rule requiring a version on every `required_providers` entry.
//!
//! Object entries must contain a `version` key. The legacy form
//! `aws = "~> 5.0"` is itself a version constraint and passes.

use crate::common::find_key;
use tfstyle_core::{
    Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity, Suggestion,
};

/// Rule id for provider-version.
pub const ID: &str = "SC.002";

/// Rule name for provider-version.
pub const NAME: &str = "provider-version";

/// Requires pinned provider versions.
#[derive(Debug, Clone)]
pub struct ProviderVersion {
    severity: Severity,
}

impl Default for ProviderVersion {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderVersion {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for ProviderVersion {
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
        "Declares a version for every required provider"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut out = Vec::new();
        for terraform in file.blocks_named("terraform") {
            for providers in terraform.children_named("required_providers") {
                for entry in providers.attributes.iter().filter(|a| a.is_block_valued) {
                    if find_key(ctx, entry.line, entry.end_line, "version")?.is_some() {
                        continue;
                    }
                    out.push(
                        Diagnostic::new(
                            ID,
                            NAME,
                            self.severity,
                            ctx.location(entry.line, entry.name_column),
                            format!("Provider `{}` has no version constraint", entry.name),
                        )
                        .with_suggestion(Suggestion::new("Add `version = \"~> X.Y\"`")),
                    );
                }
            }
        }
        Ok(out)
    }
}
