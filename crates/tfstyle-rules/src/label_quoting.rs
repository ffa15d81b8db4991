//! Rule requiring double-quoted block labels.

use tfstyle_core::{Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity, Suggestion};

/// Rule id for label-quoting.
pub const ID: &str = "ST.007";

/// Rule name for label-quoting.
pub const NAME: &str = "label-quoting";

/// Requires block labels to be quoted strings.
#[derive(Debug, Clone)]
pub struct LabelQuoting {
    severity: Severity,
}

impl Default for LabelQuoting {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelQuoting {
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

impl Rule for LabelQuoting {
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
        "Quotes block labels"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut out = Vec::new();
        for block in file.all_blocks() {
            let unquoted: Vec<_> = block.labels.iter().filter(|l| !l.quoted).collect();
            let Some(first) = unquoted.first() else {
                continue;
            };
            let names = unquoted
                .iter()
                .map(|l| format!("`{}`", l.value))
                .collect::<Vec<_>>()
                .join(", ");
            out.push(
                Diagnostic::new(
                    ID,
                    NAME,
                    self.severity,
                    ctx.location(block.start_line, first.column),
                    format!("Unquoted label {names} on `{}` block", block.keyword),
                )
                .with_suggestion(Suggestion::new(format!("Write \"{}\"", first.value))),
            );
        }
        Ok(out)
    }
}
