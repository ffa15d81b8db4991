//! Rule requiring aligned `=` signs in runs of consecutive attributes.
//!
//! # Rationale
//!
//! `terraform fmt` aligns the equals signs of adjacent attributes. Hand-edited
//! files drift; this rule reports the drift without rewriting anything.
//!
//! # Detected Patterns
//!
//! Within one body, a run is a sequence of attributes where each starts on
//! the line after the previous one ends. In a run, every `=` must sit one
//! column after the longest name, and exactly one space must follow it.
//!
//! ```text
//! ami = var.ami              # `=` at column 5, expected 15
//! instance_type = "t3.micro"
//! ```

use tfstyle_core::{
    Attribute, Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity, Suggestion,
};

/// Rule id for attribute-alignment.
pub const ID: &str = "ST.001";

/// Rule name for attribute-alignment.
pub const NAME: &str = "attribute-alignment";

/// Requires aligned `=` in consecutive attribute runs.
#[derive(Debug, Clone)]
pub struct AttributeAlignment {
    severity: Severity,
}

impl Default for AttributeAlignment {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeAlignment {
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

    fn check_body(
        &self,
        ctx: &FileContext,
        attributes: &[Attribute],
        out: &mut Vec<Diagnostic>,
    ) -> Result<(), RuleError> {
        for run in runs(attributes) {
            let expected = run
                .iter()
                .map(|a| a.name_column + a.name.chars().count())
                .max()
                .unwrap_or_default()
                + 1;

            for attribute in run {
                if attribute.equals_column != expected {
                    out.push(
                        Diagnostic::new(
                            ID,
                            NAME,
                            self.severity,
                            ctx.location(attribute.line, attribute.equals_column),
                            format!(
                                "`=` of `{}` is at column {}, expected column {}",
                                attribute.name, attribute.equals_column, expected
                            ),
                        )
                        .with_suggestion(Suggestion::new(
                            "Align `=` one space after the longest name in the group",
                        )),
                    );
                    continue;
                }

                let line = ctx
                    .line(attribute.line)
                    .ok_or_else(|| RuleError::missing_line(attribute.line))?;
                let after: String = line.text.chars().skip(attribute.equals_column).collect();
                if after.trim().is_empty() {
                    continue;
                }
                let leading = after.len() - after.trim_start().len();
                if leading != 1 || !after.starts_with(' ') {
                    out.push(Diagnostic::new(
                        ID,
                        NAME,
                        self.severity,
                        ctx.location(attribute.line, attribute.equals_column),
                        format!("Expected exactly one space after `=` of `{}`", attribute.name),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Splits a body's attributes into runs of adjacent lines.
fn runs(attributes: &[Attribute]) -> Vec<&[Attribute]> {
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..=attributes.len() {
        let breaks = i == attributes.len() || attributes[i].line != attributes[i - 1].end_line + 1;
        if breaks {
            out.push(&attributes[start..i]);
            start = i;
        }
    }
    out
}

impl Rule for AttributeAlignment {
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
        "Aligns `=` across consecutive attributes"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut out = Vec::new();
        self.check_body(ctx, &file.attributes, &mut out)?;
        for block in file.all_blocks() {
            self.check_body(ctx, &block.attributes, &mut out)?;
        }
        Ok(out)
    }
}
