//! Line-oriented structural scanner.
//!
//! Walks the source once and classifies every line into exactly one
//! [`Span`]. Quoted strings (including `${ }` / `%{ }` template
//! interpolations) and heredoc bodies are opaque: brackets, `=`, and `#`
//! inside them never affect classification.
//!
//! The scanner only records what it sees. Spacing after a comment marker,
//! label quoting, and alignment are judged by rules downstream.

use crate::source::SourceLine;
use std::ops::{Range, RangeInclusive};

/// Classification of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// `#`, `//` or `/* */` comment.
    Comment,
    /// Lines of a heredoc, terminator line included.
    HeredocBody,
    /// `keyword "label" ... {`.
    BlockOpen,
    /// A lone `}`.
    BlockClose,
    /// `name = expression`, possibly spanning several lines.
    Attribute,
    /// Empty or whitespace-only line.
    Blank,
    /// Anything else.
    Other,
}

/// Comment marker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentMarker {
    /// `# ...`
    Hash,
    /// `// ...`
    DoubleSlash,
    /// `/* ... */`
    Block,
}

impl CommentMarker {
    /// The marker as written in source.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hash => "#",
            Self::DoubleSlash => "//",
            Self::Block => "/*",
        }
    }
}

/// Payload of a comment span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentToken {
    /// Marker that opened the comment.
    pub marker: CommentMarker,
    /// Raw text following the marker on the first line.
    pub text: String,
}

/// A block label as written in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Label value without quotes.
    pub value: String,
    /// Whether the label was double-quoted.
    pub quoted: bool,
    /// 1-indexed column where the label starts.
    pub column: usize,
}

/// Parsed block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Type keyword (e.g. `resource`).
    pub keyword: String,
    /// Labels in order.
    pub labels: Vec<Label>,
    /// The body closes on the same line (`variable "x" {}`).
    pub inline_close: bool,
}

/// Parsed head of an attribute assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeHead {
    /// Attribute name.
    pub name: String,
    /// 1-indexed column of the first character of the name.
    pub name_column: usize,
    /// 1-indexed column of the `=`.
    pub equals_column: usize,
    /// Expression text. Multi-line values keep their continuation lines.
    pub value: String,
}

/// Payload of a heredoc body span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeredocToken {
    /// Terminator identifier.
    pub marker: String,
    /// Whether the terminator line was found.
    pub terminated: bool,
}

/// Classified content of a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Comment.
    Comment(CommentToken),
    /// Heredoc body.
    HeredocBody(HeredocToken),
    /// Block opener.
    BlockOpen(BlockHeader),
    /// Block closer.
    BlockClose,
    /// Attribute assignment.
    Attribute(AttributeHead),
    /// Blank line.
    Blank,
    /// Unrecognized line.
    Other,
}

/// A classified range of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// What the span contains.
    pub token: Token,
    /// First line (1-indexed).
    pub start_line: usize,
    /// Last line (1-indexed, inclusive).
    pub end_line: usize,
    /// 1-indexed column of the first non-whitespace character.
    pub start_col: usize,
    /// 1-indexed column just past the last non-whitespace character.
    pub end_col: usize,
    /// Byte range in the source, line terminators included.
    pub range: Range<usize>,
}

impl Span {
    /// Returns the span classification.
    #[must_use]
    pub fn kind(&self) -> SpanKind {
        match self.token {
            Token::Comment(_) => SpanKind::Comment,
            Token::HeredocBody(_) => SpanKind::HeredocBody,
            Token::BlockOpen(_) => SpanKind::BlockOpen,
            Token::BlockClose => SpanKind::BlockClose,
            Token::Attribute(_) => SpanKind::Attribute,
            Token::Blank => SpanKind::Blank,
            Token::Other => SpanKind::Other,
        }
    }

    /// Returns true if the given line falls inside this span.
    #[must_use]
    pub fn contains_line(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }
}

/// Recoverable problems found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanIssue {
    /// Heredoc without a terminator line.
    UnterminatedHeredoc {
        /// Line of the `<<MARKER` introducer.
        line: usize,
        /// Expected terminator.
        marker: String,
    },
    /// `/*` without a matching `*/`.
    UnterminatedBlockComment {
        /// Line of the opening `/*`.
        line: usize,
    },
    /// Brackets still open at end of file.
    UnclosedExpression {
        /// Line where the expression starts.
        line: usize,
    },
}

/// Scanner output.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    /// Spans in source order, covering every line once.
    pub spans: Vec<Span>,
    /// Recoverable problems.
    pub issues: Vec<ScanIssue>,
    /// Heredoc bodies folded into a multi-line expression, as 1-indexed
    /// line ranges with the terminator line included.
    pub embedded_heredocs: Vec<RangeInclusive<usize>>,
}

/// Scans source lines into classified spans.
#[must_use]
pub fn scan(lines: &[SourceLine]) -> ScanOutput {
    let mut scanner = Scanner {
        lines,
        pos: 0,
        out: ScanOutput::default(),
    };
    while scanner.pos < lines.len() {
        scanner.scan_next();
    }
    scanner.out
}

struct Scanner<'a> {
    lines: &'a [SourceLine],
    pos: usize,
    out: ScanOutput,
}

impl Scanner<'_> {
    fn scan_next(&mut self) {
        let start = self.pos;
        let lines = self.lines;
        let line = &lines[start];
        let trimmed = line.text.trim_start();

        if trimmed.is_empty() {
            self.push(start, start, Token::Blank);
            return;
        }

        if let Some(rest) = trimmed.strip_prefix('#') {
            self.push_comment(start, start, CommentMarker::Hash, rest);
            return;
        }
        if let Some(rest) = trimmed.strip_prefix("//") {
            self.push_comment(start, start, CommentMarker::DoubleSlash, rest);
            return;
        }
        if let Some(rest) = trimmed.strip_prefix("/*") {
            let end = if rest.contains("*/") {
                start
            } else {
                self.block_comment_end(start)
            };
            self.push_comment(start, end, CommentMarker::Block, rest);
            return;
        }

        let chars: Vec<char> = line.text.chars().collect();
        let facts = analyze_line(&chars);
        let code_end = facts.comment_column.map_or(chars.len(), |c| c - 1);
        let code = &chars[..code_end];
        let code_text: String = code.iter().collect();

        if code_text.trim() == "}" {
            self.push(start, start, Token::BlockClose);
            return;
        }
        if let Some(header) = parse_block_header(code) {
            self.push(start, start, Token::BlockOpen(header));
            return;
        }

        let mut token = parse_attribute(code, &facts).map_or(Token::Other, Token::Attribute);
        let end = self.fold_continuation(start, &facts);
        if let Token::Attribute(head) = &mut token {
            for cont in &lines[start + 1..=end] {
                head.value.push('\n');
                head.value.push_str(&cont.text);
            }
        }
        self.push(start, end, token);

        if end == start {
            if let Some(marker) = facts.heredoc {
                self.heredoc_body(start, marker);
            }
        }
    }

    fn push_comment(&mut self, start: usize, end: usize, marker: CommentMarker, text: &str) {
        let token = Token::Comment(CommentToken {
            marker,
            text: text.to_string(),
        });
        self.push(start, end, token);
    }

    /// Appends a span covering `start..=end` (0-indexed) and advances.
    fn push(&mut self, start: usize, end: usize, token: Token) {
        let first = &self.lines[start];
        let last = &self.lines[end];
        let start_col = if first.is_blank() {
            1
        } else {
            first.first_column()
        };
        self.out.spans.push(Span {
            token,
            start_line: first.index,
            end_line: last.index,
            start_col,
            end_col: last.text.trim_end().chars().count() + 1,
            range: first.offset..last.end,
        });
        self.pos = end + 1;
    }

    /// Consumes continuation lines of a multi-line expression.
    ///
    /// Returns the 0-indexed last line of the span. Heredocs opened while
    /// brackets are still open belong to the expression.
    fn fold_continuation(&mut self, start: usize, first: &LineFacts) -> usize {
        if first.depth_delta <= 0 {
            return start;
        }

        let mut depth = first.depth_delta;
        let mut heredoc = first.heredoc.clone();
        let mut idx = start;

        loop {
            if let Some(marker) = heredoc.take() {
                let body_start = idx + 1;
                let Some(end) = self.heredoc_end(body_start, &marker) else {
                    self.out.issues.push(ScanIssue::UnterminatedHeredoc {
                        line: self.lines[idx].index,
                        marker,
                    });
                    let last = self.lines.len() - 1;
                    self.mark_embedded(body_start, last);
                    return last;
                };
                self.mark_embedded(body_start, end);
                idx = end;
            }
            if depth <= 0 {
                return idx;
            }
            idx += 1;
            let Some(line) = self.lines.get(idx) else {
                self.out.issues.push(ScanIssue::UnclosedExpression {
                    line: self.lines[start].index,
                });
                return self.lines.len() - 1;
            };
            let chars: Vec<char> = line.text.chars().collect();
            let facts = analyze_line(&chars);
            depth += facts.depth_delta;
            heredoc = facts.heredoc;
        }
    }

    fn mark_embedded(&mut self, start: usize, end: usize) {
        if start <= end {
            self.out
                .embedded_heredocs
                .push(self.lines[start].index..=self.lines[end].index);
        }
    }

    /// Emits the heredoc body following the introducer at `intro`.
    fn heredoc_body(&mut self, intro: usize, marker: String) {
        let body_start = intro + 1;
        if let Some(end) = self.heredoc_end(body_start, &marker) {
            let token = Token::HeredocBody(HeredocToken {
                marker,
                terminated: true,
            });
            self.push(body_start, end, token);
            return;
        }

        self.out.issues.push(ScanIssue::UnterminatedHeredoc {
            line: self.lines[intro].index,
            marker: marker.clone(),
        });
        if body_start < self.lines.len() {
            let token = Token::HeredocBody(HeredocToken {
                marker,
                terminated: false,
            });
            self.push(body_start, self.lines.len() - 1, token);
        }
    }

    fn heredoc_end(&self, from: usize, marker: &str) -> Option<usize> {
        (from..self.lines.len()).find(|&i| self.lines[i].text.trim() == marker)
    }

    fn block_comment_end(&mut self, start: usize) -> usize {
        if let Some(end) = (start + 1..self.lines.len()).find(|&i| self.lines[i].text.contains("*/"))
        {
            return end;
        }
        self.out.issues.push(ScanIssue::UnterminatedBlockComment {
            line: self.lines[start].index,
        });
        self.lines.len() - 1
    }
}

/// Structural facts about a single line, ignoring string contents.
#[derive(Debug, Default)]
struct LineFacts {
    /// Opened minus closed brackets outside strings.
    depth_delta: i32,
    /// Column of the first assignment `=` at bracket depth zero.
    equals_column: Option<usize>,
    /// Heredoc terminator when the line ends with `<<MARKER`.
    heredoc: Option<String>,
    /// Column where a trailing comment starts.
    comment_column: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
enum Context {
    Str,
    Template(u32),
}

fn analyze_line(chars: &[char]) -> LineFacts {
    let mut facts = LineFacts::default();
    let mut stack: Vec<Context> = Vec::new();
    let mut depth = 0i32;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match stack.last().copied() {
            Some(Context::Str) => match c {
                '\\' => i += 1,
                '"' => {
                    stack.pop();
                }
                '$' | '%' if next == Some(c) => i += 1,
                '$' | '%' if next == Some('{') => {
                    stack.push(Context::Template(0));
                    i += 1;
                }
                _ => {}
            },
            Some(Context::Template(braces)) => match c {
                '"' => stack.push(Context::Str),
                '{' => {
                    stack.pop();
                    stack.push(Context::Template(braces + 1));
                }
                '}' => {
                    stack.pop();
                    if braces > 0 {
                        stack.push(Context::Template(braces - 1));
                    }
                }
                _ => {}
            },
            None => match c {
                '"' => stack.push(Context::Str),
                '#' => {
                    facts.comment_column = Some(i + 1);
                    break;
                }
                '/' if next == Some('/') => {
                    facts.comment_column = Some(i + 1);
                    break;
                }
                '/' if next == Some('*') => {
                    if let Some(close) = find_seq(chars, i + 2, &['*', '/']) {
                        i = close + 1;
                    } else {
                        facts.comment_column = Some(i + 1);
                        break;
                    }
                }
                '<' if next == Some('<') => {
                    if let Some(marker) = heredoc_marker(chars, i + 2) {
                        facts.heredoc = Some(marker);
                        break;
                    }
                    i += 1;
                }
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' => depth -= 1,
                '=' => {
                    let prev = i.checked_sub(1).map(|p| chars[p]);
                    let operator = matches!(prev, Some('=' | '!' | '<' | '>'))
                        || matches!(next, Some('=' | '>'));
                    if !operator && depth == 0 && facts.equals_column.is_none() {
                        facts.equals_column = Some(i + 1);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    facts.depth_delta = depth;
    facts
}

fn find_seq(chars: &[char], from: usize, seq: &[char]) -> Option<usize> {
    (from..chars.len()).find(|&i| chars[i..].starts_with(seq))
}

/// Parses `MARKER` or `-MARKER` after `<<`; the marker must end the line.
fn heredoc_marker(chars: &[char], from: usize) -> Option<String> {
    let mut i = from;
    if chars.get(i) == Some(&'-') {
        i += 1;
    }
    let (marker, end) = read_ident(chars, i)?;
    chars[end..]
        .iter()
        .all(|c| c.is_whitespace())
        .then_some(marker)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn read_ident(chars: &[char], from: usize) -> Option<(String, usize)> {
    if !chars.get(from).copied().is_some_and(is_ident_start) {
        return None;
    }
    let end = (from..chars.len())
        .find(|&i| !is_ident_char(chars[i]))
        .unwrap_or(chars.len());
    Some((chars[from..end].iter().collect(), end))
}

fn read_quoted(chars: &[char], from: usize) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut i = from + 1;
    while let Some(&c) = chars.get(i) {
        match c {
            '\\' => {
                value.push(c);
                value.push(*chars.get(i + 1)?);
                i += 2;
            }
            '"' => return Some((value, i + 1)),
            _ => {
                value.push(c);
                i += 1;
            }
        }
    }
    None
}

fn skip_ws(chars: &[char], from: usize) -> usize {
    (from..chars.len())
        .find(|&i| !chars[i].is_whitespace())
        .unwrap_or(chars.len())
}

fn parse_block_header(code: &[char]) -> Option<BlockHeader> {
    let start = skip_ws(code, 0);
    let (keyword, mut i) = read_ident(code, start)?;
    let mut labels = Vec::new();

    loop {
        i = skip_ws(code, i);
        match *code.get(i)? {
            '{' => break,
            '"' => {
                let (value, next) = read_quoted(code, i)?;
                labels.push(Label {
                    value,
                    quoted: true,
                    column: i + 1,
                });
                i = next;
            }
            c if is_ident_start(c) => {
                let (value, next) = read_ident(code, i)?;
                labels.push(Label {
                    value,
                    quoted: false,
                    column: i + 1,
                });
                i = next;
            }
            _ => return None,
        }
    }

    let rest: String = code[i + 1..].iter().collect();
    let rest = rest.trim();
    let inline_close = if rest.is_empty() {
        false
    } else if rest.ends_with('}') {
        true
    } else {
        return None;
    };

    Some(BlockHeader {
        keyword,
        labels,
        inline_close,
    })
}

fn parse_attribute(code: &[char], facts: &LineFacts) -> Option<AttributeHead> {
    let equals_column = facts.equals_column?;
    let eq = equals_column - 1;
    if eq >= code.len() {
        return None;
    }

    let name_start = skip_ws(code, 0);
    let (name, name_end) = read_ident(code, name_start)?;
    if skip_ws(code, name_end) != eq {
        return None;
    }

    let value: String = code[eq + 1..].iter().collect();
    Some(AttributeHead {
        name,
        name_column: name_start + 1,
        equals_column,
        value: value.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::split_lines;

    fn kinds(src: &str) -> Vec<(SpanKind, usize, usize)> {
        let lines = split_lines(src);
        scan(&lines)
            .spans
            .iter()
            .map(|s| (s.kind(), s.start_line, s.end_line))
            .collect()
    }

    #[test]
    fn classifies_basic_block() {
        let src = "# header\nresource \"aws_s3_bucket\" \"this\" {\n  bucket = \"x\"\n\n}\n";
        assert_eq!(
            kinds(src),
            vec![
                (SpanKind::Comment, 1, 1),
                (SpanKind::BlockOpen, 2, 2),
                (SpanKind::Attribute, 3, 3),
                (SpanKind::Blank, 4, 4),
                (SpanKind::BlockClose, 5, 5),
            ]
        );
    }

    #[test]
    fn parses_header_labels() {
        let lines = split_lines("resource \"a\" b {\n}\n");
        let out = scan(&lines);
        let Token::BlockOpen(header) = &out.spans[0].token else {
            panic!("expected block open");
        };
        assert_eq!(header.keyword, "resource");
        assert_eq!(header.labels.len(), 2);
        assert!(header.labels[0].quoted);
        assert!(!header.labels[1].quoted);
        assert_eq!(header.labels[1].column, 14);
    }

    #[test]
    fn inline_block_is_single_open() {
        let lines = split_lines("variable \"x\" {}\n");
        let out = scan(&lines);
        let Token::BlockOpen(header) = &out.spans[0].token else {
            panic!("expected block open");
        };
        assert!(header.inline_close);
    }

    #[test]
    fn attribute_columns() {
        let lines = split_lines("  name   = \"v\" # trailing\n");
        let out = scan(&lines);
        let Token::Attribute(head) = &out.spans[0].token else {
            panic!("expected attribute");
        };
        assert_eq!(head.name, "name");
        assert_eq!(head.name_column, 3);
        assert_eq!(head.equals_column, 10);
        assert_eq!(head.value, "\"v\"");
    }

    #[test]
    fn comparison_operators_are_not_assignments() {
        let lines = split_lines("a == b\n");
        assert_eq!(scan(&lines).spans[0].kind(), SpanKind::Other);
    }

    #[test]
    fn multi_line_expression_folds_into_one_span() {
        let src = "ports = [\n  80,\n  # not a comment span\n  443,\n]\nname = \"x\"\n";
        assert_eq!(
            kinds(src),
            vec![(SpanKind::Attribute, 1, 5), (SpanKind::Attribute, 6, 6)]
        );
    }

    #[test]
    fn heredoc_body_swallows_hash_lines() {
        let src = "policy = <<EOF\n# not a comment\n{ \"a\" = 1 }\nEOF\nx = 1\n";
        assert_eq!(
            kinds(src),
            vec![
                (SpanKind::Attribute, 1, 1),
                (SpanKind::HeredocBody, 2, 4),
                (SpanKind::Attribute, 5, 5),
            ]
        );
    }

    #[test]
    fn indented_heredoc_terminator() {
        let src = "  script = <<-EOT\n    echo hi\n  EOT\n";
        assert_eq!(
            kinds(src),
            vec![(SpanKind::Attribute, 1, 1), (SpanKind::HeredocBody, 2, 3)]
        );
    }

    #[test]
    fn unterminated_heredoc_runs_to_eof() {
        let lines = split_lines("x = <<EOF\nbody\n# more\n");
        let out = scan(&lines);
        assert_eq!(out.spans.len(), 2);
        assert_eq!(out.spans[1].kind(), SpanKind::HeredocBody);
        assert_eq!(out.spans[1].end_line, 3);
        assert_eq!(
            out.issues,
            vec![ScanIssue::UnterminatedHeredoc {
                line: 1,
                marker: "EOF".to_string()
            }]
        );
    }

    #[test]
    fn heredoc_inside_list_is_folded() {
        let src = "rules = [<<EOF\n]\nEOF\n]\n";
        assert_eq!(kinds(src), vec![(SpanKind::Attribute, 1, 4)]);
        assert_eq!(scan(&split_lines(src)).embedded_heredocs, vec![2..=3]);
    }

    #[test]
    fn heredoc_inside_call_records_body_lines() {
        let src = "x = trimspace(<<EOT\n#!/bin/sh\necho hi\nEOT\n)\ny = 1\n";
        let out = scan(&split_lines(src));
        assert_eq!(out.spans.len(), 2);
        assert_eq!((out.spans[0].start_line, out.spans[0].end_line), (1, 5));
        assert_eq!(out.embedded_heredocs, vec![2..=4]);

        let out = scan(&split_lines("x = f(<<EOT\nbody\n"));
        assert_eq!(out.embedded_heredocs, vec![2..=2]);
        assert_eq!(out.issues.len(), 1);
    }

    #[test]
    fn mixed_dollar_percent_is_not_an_escape() {
        let src = "x = \"$%{f(\"(\")}\"\ny = 1\n";
        assert_eq!(
            kinds(src),
            vec![(SpanKind::Attribute, 1, 1), (SpanKind::Attribute, 2, 2)]
        );
        assert!(scan(&split_lines(src)).issues.is_empty());
    }

    #[test]
    fn quoted_brackets_do_not_perturb() {
        let src = "a = \"{ # = }\"\nb = \"${var.x == \"}\" ? 1 : 2}\"\n";
        assert_eq!(
            kinds(src),
            vec![(SpanKind::Attribute, 1, 1), (SpanKind::Attribute, 2, 2)]
        );
    }

    #[test]
    fn header_with_quoted_brace_label() {
        let lines = split_lines("thing \"a{b\" {\n}\n");
        let out = scan(&lines);
        assert_eq!(out.spans[0].kind(), SpanKind::BlockOpen);
    }

    #[test]
    fn block_comment_spans_lines() {
        let src = "/* one\ntwo */\nx = 1\n";
        assert_eq!(
            kinds(src),
            vec![(SpanKind::Comment, 1, 2), (SpanKind::Attribute, 3, 3)]
        );
    }

    #[test]
    fn unclosed_expression_is_reported() {
        let lines = split_lines("x = [\n1,\n");
        let out = scan(&lines);
        assert_eq!(out.spans.len(), 1);
        assert_eq!(out.issues, vec![ScanIssue::UnclosedExpression { line: 1 }]);
    }

    #[test]
    fn spans_partition_source_losslessly() {
        let src = "terraform {\r\n  required_version = \"~> 1.5\"\r\n}\r\n\n\
                   locals {\n  m = {\n    a = 1\n  }\n  doc = <<EOF\n# x\nEOF\n}\n// tail";
        let lines = split_lines(src);
        let out = scan(&lines);
        let rebuilt: String = out.spans.iter().map(|s| &src[s.range.clone()]).collect();
        assert_eq!(rebuilt, src);

        let mut next = 1;
        for span in &out.spans {
            assert_eq!(span.start_line, next);
            next = span.end_line + 1;
        }
        assert_eq!(next, lines.len() + 1);
    }

    #[test]
    fn other_lines_never_panic() {
        let src = "}}}\n{{{\n\"unterminated\n= = =\n<<\n<<-\n";
        let lines = split_lines(src);
        let out = scan(&lines);
        let covered: usize = out
            .spans
            .iter()
            .map(|s| s.end_line - s.start_line + 1)
            .sum();
        assert_eq!(covered, lines.len());
    }
}
