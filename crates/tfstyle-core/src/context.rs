//! Context types for rule execution.

use crate::source::SourceLine;
use crate::types::Location;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Logical role of a file within a module.
///
/// The engine never infers roles itself. Callers classify files (usually
/// from the file name) and pass the role in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileRole {
    /// Primary resources (`main.tf`).
    Main,
    /// Input variable declarations (`variables.tf`).
    Variables,
    /// Output declarations (`outputs.tf`).
    Outputs,
    /// Provider configuration (`providers.tf`).
    Providers,
    /// Version constraints (`versions.tf`, `terraform.tf`).
    Versions,
    /// Local values (`locals.tf`).
    Locals,
    /// Usage examples.
    Example,
    /// Test configurations.
    Test,
    /// Anything else.
    Other,
}

impl FileRole {
    /// Returns true for example and test contexts.
    #[must_use]
    pub fn is_sample(self) -> bool {
        matches!(self, Self::Example | Self::Test)
    }
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Main => "main",
            Self::Variables => "variables",
            Self::Outputs => "outputs",
            Self::Providers => "providers",
            Self::Versions => "versions",
            Self::Locals => "locals",
            Self::Example => "example",
            Self::Test => "test",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Context provided to rules for one file.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    /// Path of the file as supplied by the caller.
    pub path: &'a Path,
    /// Raw file contents.
    pub content: &'a str,
    /// Role assigned by the caller, if known.
    pub role: Option<FileRole>,
    /// Source lines.
    pub lines: &'a [SourceLine],
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(
        path: &'a Path,
        content: &'a str,
        role: Option<FileRole>,
        lines: &'a [SourceLine],
    ) -> Self {
        Self {
            path,
            content,
            role,
            lines,
        }
    }

    /// Returns the 1-indexed line, if present.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&'a SourceLine> {
        index.checked_sub(1).and_then(|i| self.lines.get(i))
    }

    /// Builds a location whose miette span runs from `column` to the end of
    /// the line.
    #[must_use]
    pub fn location(&self, line: usize, column: usize) -> Location {
        let location = Location::new(self.path, line, column);
        match self.line(line) {
            Some(source) => {
                let start: usize = source
                    .text
                    .chars()
                    .take(column.saturating_sub(1))
                    .map(char::len_utf8)
                    .sum();
                let length = source.text.len().saturating_sub(start);
                let bom = if line == 1 && self.content.starts_with('\u{feff}') {
                    '\u{feff}'.len_utf8()
                } else {
                    0
                };
                location.with_span(source.offset + bom + start, length)
            }
            None => location,
        }
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// Returns the file length when the line is out of range.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if self.line(line).is_some() {
            self.location(line, column).offset
        } else {
            self.content.len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::split_lines;

    #[test]
    fn location_spans_rest_of_line() {
        let content = "a = 1\n  bb = 2\n";
        let lines = split_lines(content);
        let ctx = FileContext::new(Path::new("main.tf"), content, None, &lines);

        let loc = ctx.location(2, 3);
        assert_eq!(loc.offset, 8);
        assert_eq!(loc.length, 6);
        assert_eq!(&content[loc.offset..loc.offset + loc.length], "bb = 2");
    }

    #[test]
    fn location_skips_byte_order_mark() {
        let content = "\u{feff}a = 1\n";
        let lines = split_lines(content);
        let ctx = FileContext::new(Path::new("main.tf"), content, None, &lines);

        let loc = ctx.location(1, 1);
        assert_eq!(&content[loc.offset..loc.offset + loc.length], "a = 1");
    }

    #[test]
    fn offset_calculation() {
        let content = "line1\nline2\nline3";
        let lines = split_lines(content);
        let ctx = FileContext::new(Path::new("x.tf"), content, None, &lines);

        assert_eq!(ctx.offset_for(1, 1), 0);
        assert_eq!(ctx.offset_for(2, 1), 6);
        assert_eq!(ctx.offset_for(2, 3), 8);
        assert_eq!(ctx.offset_for(9, 1), content.len());
    }

    #[test]
    fn sample_roles() {
        assert!(FileRole::Example.is_sample());
        assert!(FileRole::Test.is_sample());
        assert!(!FileRole::Main.is_sample());
        assert_eq!(FileRole::Variables.to_string(), "variables");
    }
}
