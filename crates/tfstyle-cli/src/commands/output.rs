//! Rendering of lint results.

use anyhow::Result;
use miette::{NamedSource, Report};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::Path;
use tfstyle::{Diagnostic, DiagnosticReport, LintResult};

use crate::OutputFormat;

/// Prints lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    let rendered = render(result, format)?;
    print!("{rendered}");
    Ok(())
}

/// Renders lint results in the specified format.
pub fn render(result: &LintResult, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(result),
        OutputFormat::Json => render_json(result)?,
        OutputFormat::Compact => render_compact(result),
        OutputFormat::Pretty => render_pretty(result),
    })
}

fn summary(result: &LintResult) -> String {
    let (errors, warnings) = result.count_by_severity();
    let mut line = format!(
        "Found {errors} error(s), {warnings} warning(s) in {} file(s)",
        result.files_checked
    );
    if result.files_skipped > 0 {
        let _ = write!(line, ", {} skipped", result.files_skipped);
    }
    line
}

fn render_text(result: &LintResult) -> String {
    let mut out = String::new();
    for diagnostic in &result.diagnostics {
        let _ = writeln!(out, "{}", diagnostic.format());
    }
    let _ = writeln!(out, "{}", summary(result));
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    diagnostics: &'a [Diagnostic],
    files_checked: usize,
    files_skipped: usize,
    errors: usize,
    warnings: usize,
}

fn render_json(result: &LintResult) -> Result<String> {
    let (errors, warnings) = result.count_by_severity();
    let report = JsonReport {
        diagnostics: &result.diagnostics,
        files_checked: result.files_checked,
        files_skipped: result.files_skipped,
        errors,
        warnings,
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}

fn render_compact(result: &LintResult) -> String {
    let mut out = String::new();
    for diagnostic in &result.diagnostics {
        let _ = writeln!(out, "{diagnostic}");
    }
    out
}

fn render_pretty(result: &LintResult) -> String {
    let mut sources: HashMap<&Path, Option<String>> = HashMap::new();
    let mut out = String::new();

    for diagnostic in &result.diagnostics {
        let path = diagnostic.location.file.as_path();
        let source = sources
            .entry(path)
            .or_insert_with(|| std::fs::read_to_string(path).ok());

        let report = Report::new(DiagnosticReport::from(diagnostic));
        let report = match source {
            Some(content) => report.with_source_code(NamedSource::new(
                path.display().to_string(),
                content.clone(),
            )),
            None => report,
        };
        let _ = writeln!(
            out,
            "{} at {}:{}:{}\n{report:?}",
            diagnostic.severity,
            path.display(),
            diagnostic.location.line,
            diagnostic.location.column
        );
    }
    let _ = writeln!(out, "{}", summary(result));
    out
}
