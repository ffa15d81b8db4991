//! Rule traits for defining lint rules.

use crate::context::FileContext;
use crate::model::ParsedFile;
use crate::types::{Diagnostic, Severity};
use serde::{Deserialize, Serialize};

/// Rule family. Determines the id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Layout and naming (`ST`).
    Style,
    /// Variable and output conventions (`IO`).
    InputOutput,
    /// Comments and descriptions (`DC`).
    Documentation,
    /// Version pinning and secret handling (`SC`).
    Security,
}

impl Category {
    /// Two-letter id prefix.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Style => "ST",
            Self::InputOutput => "IO",
            Self::Documentation => "DC",
            Self::Security => "SC",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Style => "style",
            Self::InputOutput => "input-output",
            Self::Documentation => "documentation",
            Self::Security => "security",
        };
        f.write_str(name)
    }
}

/// A rule failed to evaluate a file.
///
/// Reported to the user as a `RI.001` diagnostic; other rules still run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuleError {
    message: String,
}

impl RuleError {
    /// Creates a new rule error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error for a line the model refers to but the source lacks.
    #[must_use]
    pub fn missing_line(line: usize) -> Self {
        Self::new(format!("line {line} is out of range"))
    }
}

/// A per-file lint rule operating on the structural model.
///
/// # Example
///
/// ```ignore
/// use tfstyle_core::{Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError};
///
/// pub struct NoEmptyLocals;
///
/// impl Rule for NoEmptyLocals {
///     fn id(&self) -> &'static str { "ST.100" }
///     fn name(&self) -> &'static str { "no-empty-locals" }
///     fn category(&self) -> Category { Category::Style }
///
///     fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
///         Ok(file
///             .blocks_named("locals")
///             .filter(|b| b.attributes.is_empty())
///             .map(|b| Diagnostic::new(
///                 self.id(),
///                 self.name(),
///                 self.default_severity(),
///                 ctx.location(b.start_line, 1),
///                 "Empty locals block",
///             ))
///             .collect())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the stable id (e.g., "ST.001").
    fn id(&self) -> &'static str;

    /// Returns the kebab-case name of this rule (e.g., "attribute-alignment").
    fn name(&self) -> &'static str;

    /// Returns the rule family.
    fn category(&self) -> Category;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for diagnostics from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Whether the rule runs when no preset or config says otherwise.
    fn default_enabled(&self) -> bool {
        true
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single file.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] when the model is inconsistent with the
    /// rule's assumptions. The caller reports it and moves on.
    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Serializable summary of a registered rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    /// Stable id.
    pub id: String,
    /// Kebab-case name.
    pub name: String,
    /// Rule family.
    pub category: Category,
    /// One-line description.
    pub description: String,
    /// Runs unless disabled.
    pub default_enabled: bool,
    /// Severity before overrides.
    pub default_severity: Severity,
}

impl RuleDescriptor {
    /// Describes a rule.
    #[must_use]
    pub fn of(rule: &dyn Rule) -> Self {
        Self {
            id: rule.id().to_string(),
            name: rule.name().to_string(),
            category: rule.category(),
            description: rule.description().to_string(),
            default_enabled: rule.default_enabled(),
            default_severity: rule.default_severity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct TestRule;

    impl Rule for TestRule {
        fn id(&self) -> &'static str {
            "ST.900"
        }
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn category(&self) -> Category {
            Category::Style
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }

        fn check(
            &self,
            ctx: &FileContext,
            _file: &ParsedFile,
        ) -> Result<Vec<Diagnostic>, RuleError> {
            Ok(vec![Diagnostic::new(
                self.id(),
                self.name(),
                self.default_severity(),
                ctx.location(1, 1),
                "Test diagnostic",
            )])
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.id(), "ST.900");
        assert!(rule.id().starts_with(rule.category().prefix()));
        assert_eq!(rule.default_severity(), Severity::Warning);
        assert!(!rule.requires_allow_reason());

        let file = ParsedFile::parse("a = 1\n");
        let ctx = FileContext::new(Path::new("main.tf"), "a = 1\n", None, &file.lines);
        let found = rule.check(&ctx, &file).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn descriptor_copies_metadata() {
        let d = RuleDescriptor::of(&TestRule);
        assert_eq!(d.name, "test-rule");
        assert_eq!(d.category, Category::Style);
        assert!(d.default_enabled);
    }
}
