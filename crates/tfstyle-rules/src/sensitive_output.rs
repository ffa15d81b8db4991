//! Rule requiring `sensitive = true` on outputs that look secret.
//!
//! # Configuration
//!
//! - `patterns`: Extra name fragments treated as secret (default: none)

use crate::common::is_secret_name;
use tfstyle_core::{
    Category, Diagnostic, FileContext, ParsedFile, Rule, RuleError, Severity, Suggestion,
};

/// Rule id for sensitive-output.
pub const ID: &str = "SC.004";

/// Rule name for sensitive-output.
pub const NAME: &str = "sensitive-output";

/// Requires secret-looking outputs to be marked sensitive.
#[derive(Debug, Clone)]
pub struct SensitiveOutput {
    patterns: Vec<String>,
    severity: Severity,
}

impl Default for SensitiveOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl SensitiveOutput {
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

impl Rule for SensitiveOutput {
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
        "Marks secret-looking outputs as sensitive"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let mut out = Vec::new();
        for output in file.blocks_named("output") {
            let Some(name) = output.labels.first() else {
                continue;
            };
            if !is_secret_name(&name.value, &self.patterns) {
                continue;
            }
            let sensitive = output
                .attribute("sensitive")
                .is_some_and(|a| a.value.trim() == "true");
            if !sensitive {
                out.push(
                    Diagnostic::new(
                        ID,
                        NAME,
                        self.severity,
                        ctx.location(output.start_line, name.column),
                        format!("Output `{}` looks secret but is not sensitive", name.value),
                    )
                    .with_suggestion(Suggestion::new("Add `sensitive = true`")),
                );
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
    fn secret_outputs_need_flag() {
        let src = r#"output "db_password" {
  value = random_password.db.result
}

output "api_token" {
  value     = var.token
  sensitive = true
}

output "secret_arn" {
  value = aws_secretsmanager_secret.this.arn
}

output "vpc_id" {
  value = aws_vpc.this.id
}
"#;
        let found = run(&SensitiveOutput::new(), src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line(), 1);
        assert_eq!(found[0].severity, Severity::Error);
    }

    #[test]
    fn extra_patterns() {
        let src = "output \"signing_pem\" {\n  value = 1\n}\n";
        assert!(run(&SensitiveOutput::new(), src).is_empty());
        let rule = SensitiveOutput::new().patterns(vec!["pem".to_string()]);
        assert_eq!(run(&rule, src).len(), 1);
    }
}
