//! Rule requiring a canonical instance name in examples and tests.
//!
//! Disabled by default. Only files with the `Example` or `Test` role are
//! checked.
//!
//! # Configuration
//!
//! - `name`: Required instance label (default: "this")

use tfstyle_core::{Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity};

/// Rule id for canonical-instance-name.
pub const ID: &str = "ST.010";

/// Rule name for canonical-instance-name.
pub const NAME: &str = "canonical-instance-name";

/// Default canonical instance name.
pub const DEFAULT_NAME: &str = "this";

/// Requires resource and data instance labels to use one fixed name.
#[derive(Debug, Clone)]
pub struct CanonicalInstanceName {
    canonical: String,
    severity: Severity,
}

impl Default for CanonicalInstanceName {
    fn default() -> Self {
        Self::new()
    }
}

impl CanonicalInstanceName {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            canonical: DEFAULT_NAME.to_string(),
            severity: Severity::Warning,
        }
    }

    /// Sets the required instance name.
    #[must_use]
    pub fn canonical(mut self, name: impl Into<String>) -> Self {
        self.canonical = name.into();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for CanonicalInstanceName {
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
        "Uses the canonical instance name in examples and tests"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn default_enabled(&self) -> bool {
        false
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        if !ctx.role.is_some_and(|r| r.is_sample()) {
            return Ok(Vec::new());
        }

        Ok(file
            .blocks
            .iter()
            .filter(|b| b.keyword == "resource" || b.keyword == "data")
            .filter_map(|b| b.labels.get(1).map(|label| (b, label)))
            .filter(|(_, label)| label.value != self.canonical)
            .map(|(block, label)| {
                Diagnostic::new(
                    ID,
                    NAME,
                    self.severity,
                    ctx.location(block.start_line, label.column),
                    format!(
                        "Instance `{}` should be named `{}`",
                        label.value, self.canonical
                    ),
                )
            })
            .collect())
    }
}
