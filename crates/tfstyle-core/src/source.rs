//! Source text split into immutable, position-aware lines.

use std::ops::Range;

/// Kind of leading whitespace on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indentation {
    /// No leading whitespace (or a blank line).
    None,
    /// Only spaces, with the count.
    Spaces(usize),
    /// Only tabs, with the count.
    Tabs(usize),
    /// Both spaces and tabs.
    Mixed,
}

impl Indentation {
    fn of(text: &str) -> Self {
        let lead: Vec<char> = text
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        let tabs = lead.iter().filter(|c| **c == '\t').count();
        match (lead.len(), tabs) {
            (0, _) => Self::None,
            (n, 0) => Self::Spaces(n),
            (n, t) if n == t => Self::Tabs(n),
            _ => Self::Mixed,
        }
    }
}

/// A single line of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Line number (1-indexed).
    pub index: usize,
    /// Line text without the line terminator.
    pub text: String,
    /// Byte offset of the first character of the line.
    pub offset: usize,
    /// Byte offset one past the end of the line, terminator included.
    pub end: usize,
    /// Leading whitespace kind.
    pub indentation: Indentation,
}

impl SourceLine {
    /// Byte range of the line including its terminator.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end
    }

    /// Returns true if the line is empty or whitespace-only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of leading whitespace characters.
    #[must_use]
    pub fn indent_width(&self) -> usize {
        self.text
            .chars()
            .take_while(|c| c.is_whitespace())
            .count()
    }

    /// 1-indexed column of the first non-whitespace character.
    #[must_use]
    pub fn first_column(&self) -> usize {
        self.indent_width() + 1
    }
}

/// Splits raw file content into lines, preserving byte offsets.
///
/// A trailing newline does not produce an extra empty line. Both `\n` and
/// `\r\n` terminators are accepted; the terminator stays inside the line's
/// byte range so the ranges partition the input exactly. A leading UTF-8
/// byte order mark is dropped from the first line's text but kept in its
/// byte range.
#[must_use]
pub fn split_lines(content: &str) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let mut offset = 0;

    for (i, raw) in content.split_inclusive('\n').enumerate() {
        let text = raw
            .strip_suffix('\n')
            .map_or(raw, |t| t.strip_suffix('\r').unwrap_or(t));
        let text = if i == 0 {
            text.strip_prefix('\u{feff}').unwrap_or(text)
        } else {
            text
        };
        lines.push(SourceLine {
            index: i + 1,
            text: text.to_string(),
            offset,
            end: offset + raw.len(),
            indentation: Indentation::of(text),
        });
        offset += raw.len();
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_with_offsets() {
        let lines = split_lines("a = 1\n\nb = 2");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].range(), 0..6);
        assert_eq!(lines[1].range(), 6..7);
        assert!(lines[1].is_blank());
        assert_eq!(lines[2].text, "b = 2");
        assert_eq!(lines[2].index, 3);
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        assert_eq!(split_lines("x\n").len(), 1);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn byte_order_mark_is_not_text() {
        let src = "\u{feff}x = 1\ny = 2\n";
        let lines = split_lines(src);
        assert_eq!(lines[0].text, "x = 1");
        assert_eq!(lines[0].range(), 0..9);
        assert_eq!(lines[1].range(), 9..15);
        assert_eq!(split_lines("a\n\u{feff}b\n")[1].text, "\u{feff}b");
    }

    #[test]
    fn strips_carriage_return() {
        let lines = split_lines("a\r\nb\r\n");
        assert_eq!(lines[0].text, "a");
        assert_eq!(lines[0].range(), 0..3);
    }

    #[test]
    fn indentation_kinds() {
        let lines = split_lines("x\n  x\n\t\tx\n \tx\n");
        assert_eq!(lines[0].indentation, Indentation::None);
        assert_eq!(lines[1].indentation, Indentation::Spaces(2));
        assert_eq!(lines[2].indentation, Indentation::Tabs(2));
        assert_eq!(lines[3].indentation, Indentation::Mixed);
    }
}
