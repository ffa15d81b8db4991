//! Builds the block tree from scanned spans.

use crate::model::{Attribute, Block, BlockPath, Comment, ParsedFile, StructuralIssue};
use crate::scanner::{scan, CommentMarker, ScanIssue, ScanOutput, Span, SpanKind, Token};
use std::ops::RangeInclusive;
use crate::source::{split_lines, SourceLine};
use tracing::debug;

/// Scans `content` and builds its [`ParsedFile`].
///
/// Never fails: malformed structure is recorded in
/// [`ParsedFile::issues`] and the tree holds whatever was recovered.
#[must_use]
pub fn build(content: &str) -> ParsedFile {
    let lines = split_lines(content);
    let ScanOutput {
        spans,
        issues,
        embedded_heredocs,
    } = scan(&lines);

    let mut builder = Builder {
        issues: issues.into_iter().map(StructuralIssue::from).collect(),
        ..Builder::default()
    };
    for span in &spans {
        if !builder.accept(span) {
            debug!(line = span.start_line, "structural analysis stopped");
            break;
        }
    }
    builder.close_remaining(lines.len());

    let comments = collect_comments(&spans, &embedded_heredocs, &lines);
    let line_kinds: Vec<SpanKind> = spans
        .iter()
        .flat_map(|s| std::iter::repeat(s.kind()).take(s.end_line - s.start_line + 1))
        .collect();
    let mut heredoc_lines: Vec<bool> = line_kinds
        .iter()
        .map(|kind| *kind == SpanKind::HeredocBody)
        .collect();
    for range in &embedded_heredocs {
        for line in range.clone() {
            if let Some(flag) = heredoc_lines.get_mut(line - 1) {
                *flag = true;
            }
        }
    }
    let partial = builder.partial || !builder.issues.is_empty();

    ParsedFile {
        lines,
        spans,
        attributes: builder.attributes,
        blocks: builder.roots,
        comments,
        issues: builder.issues,
        partial,
        line_kinds,
        heredoc_lines,
    }
}

impl From<ScanIssue> for StructuralIssue {
    fn from(issue: ScanIssue) -> Self {
        match issue {
            ScanIssue::UnterminatedHeredoc { line, marker } => {
                Self::UnterminatedHeredoc { line, marker }
            }
            ScanIssue::UnterminatedBlockComment { line } => Self::UnterminatedBlockComment { line },
            ScanIssue::UnclosedExpression { line } => Self::UnclosedExpression { line },
        }
    }
}

#[derive(Default)]
struct Builder {
    stack: Vec<Block>,
    roots: Vec<Block>,
    attributes: Vec<Attribute>,
    issues: Vec<StructuralIssue>,
    partial: bool,
}

impl Builder {
    /// Feeds one span. Returns false once structure can no longer be trusted.
    fn accept(&mut self, span: &Span) -> bool {
        match &span.token {
            Token::BlockOpen(header) => {
                let (path, parent) = match self.stack.last() {
                    Some(top) => (top.path.child(top.children.len()), Some(top.path.clone())),
                    None => (BlockPath::root(self.roots.len()), None),
                };
                let block = Block {
                    keyword: header.keyword.clone(),
                    labels: header.labels.clone(),
                    path,
                    parent,
                    children: Vec::new(),
                    attributes: Vec::new(),
                    start_line: span.start_line,
                    end_line: span.end_line,
                    depth: self.stack.len(),
                    inline: header.inline_close,
                };
                if block.inline {
                    self.attach(block);
                } else {
                    self.stack.push(block);
                }
            }
            Token::Attribute(head) => {
                let attribute = Attribute {
                    name: head.name.clone(),
                    name_column: head.name_column,
                    equals_column: head.equals_column,
                    value: head.value.clone(),
                    line: span.start_line,
                    end_line: span.end_line,
                    depth: self.stack.len(),
                    is_block_valued: head.value.starts_with('{'),
                };
                match self.stack.last_mut() {
                    Some(top) => top.attributes.push(attribute),
                    None => self.attributes.push(attribute),
                }
            }
            Token::BlockClose => {
                let Some(mut block) = self.stack.pop() else {
                    self.issues.push(StructuralIssue::UnmatchedClose {
                        line: span.start_line,
                    });
                    self.partial = true;
                    return false;
                };
                block.end_line = span.start_line;
                self.attach(block);
            }
            Token::Comment(_) | Token::HeredocBody(_) | Token::Blank | Token::Other => {}
        }
        true
    }

    fn attach(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(block),
            None => self.roots.push(block),
        }
    }

    fn close_remaining(&mut self, last_line: usize) {
        while let Some(mut block) = self.stack.pop() {
            self.issues.push(StructuralIssue::UnclosedBlock {
                line: block.start_line,
                block: block.display_name(),
            });
            block.end_line = last_line;
            self.partial = true;
            self.attach(block);
        }
    }
}

fn collect_comments(
    spans: &[Span],
    embedded: &[RangeInclusive<usize>],
    lines: &[SourceLine],
) -> Vec<Comment> {
    let mut comments = Vec::new();
    for span in spans {
        match &span.token {
            Token::Comment(token) => comments.push(Comment {
                text: token.text.clone(),
                marker: token.marker,
                line: span.start_line,
                column: span.start_col,
                inside_heredoc: false,
            }),
            Token::HeredocBody(_) => {
                heredoc_comments(&lines[span.start_line - 1..span.end_line], &mut comments);
            }
            Token::Attribute(_) | Token::Other => {
                for range in embedded.iter().filter(|r| span.contains_line(*r.start())) {
                    heredoc_comments(&lines[*range.start() - 1..*range.end()], &mut comments);
                }
            }
            _ => {}
        }
    }
    comments
}

/// Keeps `#` lines of a heredoc body as comments marked as string content.
fn heredoc_comments(body: &[SourceLine], comments: &mut Vec<Comment>) {
    for line in body {
        if let Some(rest) = line.text.trim_start().strip_prefix('#') {
            comments.push(Comment {
                text: rest.to_string(),
                marker: CommentMarker::Hash,
                line: line.index,
                column: line.first_column(),
                inside_heredoc: true,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"resource "google_compute_instance" "this" {
  name = "vm"

  network_interface {
    network = "default"
  }

  lifecycle {}
}

variable "region" {}
"#;

    #[test]
    fn builds_nested_tree() {
        let file = build(NESTED);
        assert!(file.issues.is_empty());
        assert!(!file.partial);
        assert_eq!(file.blocks.len(), 2);

        let resource = &file.blocks[0];
        assert_eq!(resource.keyword, "resource");
        assert_eq!(resource.label(1), Some("this"));
        assert_eq!((resource.start_line, resource.end_line), (1, 9));
        assert_eq!(resource.attributes.len(), 1);
        assert_eq!(resource.children.len(), 2);

        let nic = &resource.children[0];
        assert_eq!(nic.depth, 1);
        assert_eq!(nic.attributes[0].depth, 2);
        assert_eq!((nic.start_line, nic.end_line), (4, 6));

        let lifecycle = &resource.children[1];
        assert!(lifecycle.inline);
        assert_eq!(lifecycle.end_line, 8);

        assert_eq!(file.blocks[1].path, BlockPath::root(1));
    }

    #[test]
    fn parent_links_resolve() {
        let file = build(NESTED);
        let nic = &file.blocks[0].children[0];
        let parent = file.parent_of(nic).map(|b| b.keyword.as_str());
        assert_eq!(parent, Some("resource"));
        assert!(file.parent_of(&file.blocks[0]).is_none());
        assert_eq!(file.block(&nic.path), Some(nic));
    }

    #[test]
    fn items_are_in_source_order() {
        let file = build(NESTED);
        let lines: Vec<usize> = file.blocks[0]
            .items()
            .iter()
            .map(crate::model::BodyItem::start_line)
            .collect();
        assert_eq!(lines, vec![2, 4, 8]);
    }

    #[test]
    fn all_blocks_is_preorder() {
        let file = build(NESTED);
        let names: Vec<&str> = file.all_blocks().iter().map(|b| b.keyword.as_str()).collect();
        assert_eq!(
            names,
            vec!["resource", "network_interface", "lifecycle", "variable"]
        );
    }

    #[test]
    fn unmatched_close_stops_structure() {
        let file = build("a = 1\n}\nresource \"x\" \"y\" {\n}\n");
        assert!(file.partial);
        assert_eq!(file.issues, vec![StructuralIssue::UnmatchedClose { line: 2 }]);
        assert!(file.blocks.is_empty());
        assert_eq!(file.attributes.len(), 1);
    }

    #[test]
    fn unclosed_block_reported_once_per_block() {
        let file = build("module \"m\" {\n  inner {\n    x = 1\n");
        assert_eq!(file.issues.len(), 2);
        assert_eq!(file.blocks.len(), 1);
        assert_eq!(file.blocks[0].end_line, 3);
        assert_eq!(file.blocks[0].children[0].end_line, 3);
    }

    #[test]
    fn heredoc_hash_lines_are_flagged_comments() {
        let file = build("# real\nx = <<EOF\n#fake\nEOF\n");
        assert_eq!(file.comments.len(), 2);
        assert!(!file.comments[0].inside_heredoc);
        assert!(file.comments[1].inside_heredoc);
        assert_eq!(file.comments[1].line, 3);
        assert_eq!(file.line_kind(3), Some(SpanKind::HeredocBody));
    }

    #[test]
    fn heredoc_inside_call_keeps_hash_lines() {
        let file = build("x = trimspace(<<EOT\n#!/bin/sh\nEOT\n)\n");
        assert_eq!(file.comments.len(), 1);
        assert!(file.comments[0].inside_heredoc);
        assert_eq!(file.comments[0].line, 2);
        assert_eq!(file.line_kind(2), Some(SpanKind::Attribute));
        assert!(file.in_heredoc(2));
        assert!(file.in_heredoc(3));
        assert!(!file.in_heredoc(1));
        assert!(!file.in_heredoc(4));
    }

    #[test]
    fn leading_byte_order_mark_keeps_first_block() {
        let file = build("\u{feff}resource \"a\" \"b\" {\n  x = 1\n}\n");
        assert!(file.issues.is_empty());
        assert_eq!(file.blocks.len(), 1);
        assert_eq!(file.blocks[0].keyword, "resource");
        assert_eq!(file.blocks[0].attributes[0].name_column, 3);
        assert_eq!(file.spans[0].range, 0..22);
    }

    #[test]
    fn blank_gap_counts_runs() {
        let file = build("a = 1\n\n\nb = 2\n\nc = 3\n");
        let gap = file.blank_gap(1, 6);
        assert_eq!(gap.total, 3);
        assert_eq!(gap.longest, 2);
    }

    #[test]
    fn block_valued_attribute() {
        let file = build("locals {\n  tags = {\n    a = \"b\"\n  }\n}\n");
        let tags = &file.blocks[0].attributes[0];
        assert!(tags.is_block_valued);
        assert_eq!((tags.line, tags.end_line), (2, 4));
        assert!(file.blocks[0].children.is_empty());
    }

    #[test]
    fn file_without_blocks_has_no_issues() {
        let file = build("# only comments\n\nregion = \"eu-west-1\"\n");
        assert!(file.issues.is_empty());
        assert!(file.blocks.is_empty());
    }
}
