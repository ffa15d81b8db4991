//! Rules keeping `variable` and `output` blocks in their conventional files.
//!
//! Both rules are skipped when the caller did not assign a file role.

use tfstyle_core::{
    Category, Diagnostic, FileContext, FileRole, ParsedFile, Rule, RuleError, Severity, Suggestion,
};

/// Rule id for variable-placement.
pub const VARIABLE_ID: &str = "IO.001";

/// Rule name for variable-placement.
pub const VARIABLE_NAME: &str = "variable-placement";

/// Rule id for output-placement.
pub const OUTPUT_ID: &str = "IO.002";

/// Rule name for output-placement.
pub const OUTPUT_NAME: &str = "output-placement";

/// Reports `keyword` blocks in files whose role is not `home`.
#[derive(Debug, Clone)]
pub struct BlockPlacement {
    id: &'static str,
    name: &'static str,
    keyword: &'static str,
    home: FileRole,
    file_name: &'static str,
    severity: Severity,
}

impl BlockPlacement {
    /// `variable` blocks belong in `variables.tf`.
    #[must_use]
    pub fn variables() -> Self {
        Self {
            id: VARIABLE_ID,
            name: VARIABLE_NAME,
            keyword: "variable",
            home: FileRole::Variables,
            file_name: "variables.tf",
            severity: Severity::Warning,
        }
    }

    /// `output` blocks belong in `outputs.tf`.
    #[must_use]
    pub fn outputs() -> Self {
        Self {
            id: OUTPUT_ID,
            name: OUTPUT_NAME,
            keyword: "output",
            home: FileRole::Outputs,
            file_name: "outputs.tf",
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

impl Rule for BlockPlacement {
    fn id(&self) -> &'static str {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn category(&self) -> Category {
        Category::InputOutput
    }

    fn description(&self) -> &'static str {
        match self.home {
            FileRole::Variables => "Declares variables only in variables.tf",
            _ => "Declares outputs only in outputs.tf",
        }
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let Some(role) = ctx.role else {
            return Ok(Vec::new());
        };
        if role == self.home {
            return Ok(Vec::new());
        }

        Ok(file
            .blocks_named(self.keyword)
            .map(|block| {
                Diagnostic::new(
                    self.id,
                    self.name,
                    self.severity,
                    ctx.location(block.start_line, 1),
                    format!("`{}` declared outside {}", block.display_name(), self.file_name),
                )
                .with_suggestion(Suggestion::new(format!("Move it to {}", self.file_name)))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{run, run_as};

    const SRC: &str = "variable \"a\" {}\n\noutput \"b\" {}\n";

    #[test]
    fn unknown_role_is_skipped() {
        assert!(run(&BlockPlacement::variables(), SRC).is_empty());
        assert!(run(&BlockPlacement::outputs(), SRC).is_empty());
    }

    #[test]
    fn home_file_passes() {
        assert!(run_as(&BlockPlacement::variables(), SRC, Some(FileRole::Variables)).is_empty());
        assert!(run_as(&BlockPlacement::outputs(), SRC, Some(FileRole::Outputs)).is_empty());
    }

    #[test]
    fn other_roles_report() {
        let found = run_as(&BlockPlacement::variables(), SRC, Some(FileRole::Main));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rule_id, VARIABLE_ID);

        let found = run_as(&BlockPlacement::outputs(), SRC, Some(FileRole::Variables));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line(), 3);
    }
}
