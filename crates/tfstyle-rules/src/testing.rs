//! Helpers for rule unit tests.

use std::path::Path;
use tfstyle_core::{Diagnostic, FileContext, FileRole, ParsedFile, Rule};

/// Runs one rule over `src` as `main.tf` with no role.
pub(crate) fn run(rule: &dyn Rule, src: &str) -> Vec<Diagnostic> {
    run_as(rule, src, None)
}

/// Runs one rule over `src` with the given role.
pub(crate) fn run_as(rule: &dyn Rule, src: &str, role: Option<FileRole>) -> Vec<Diagnostic> {
    let file = ParsedFile::parse(src);
    let ctx = FileContext::new(Path::new("main.tf"), src, role, &file.lines);
    rule.check(&ctx, &file).expect("rule should not fail")
}
