//! Structural model of a parsed configuration file.
//!
//! Blocks own their children and attributes. A child refers back to its
//! parent only through a [`BlockPath`], which is resolved against the
//! owning [`ParsedFile`] on demand.

use crate::scanner::{CommentMarker, Label, Span, SpanKind};
use crate::source::SourceLine;

/// Position of a block in the tree, as child indices from the file root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPath(Vec<usize>);

impl BlockPath {
    /// Path of the `index`-th top-level block.
    #[must_use]
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    /// Path of the `index`-th child of this block.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }

    /// Child indices from the root.
    #[must_use]
    pub fn segments(&self) -> &[usize] {
        &self.0
    }
}

/// A `name = value` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// 1-indexed column of the name.
    pub name_column: usize,
    /// 1-indexed column of the `=`.
    pub equals_column: usize,
    /// Expression text as written.
    pub value: String,
    /// First line (1-indexed).
    pub line: usize,
    /// Last line; differs from `line` for multi-line values.
    pub end_line: usize,
    /// Nesting depth (0 for top-level attributes).
    pub depth: usize,
    /// The value is an inline object such as `tags = { ... }`.
    pub is_block_valued: bool,
}

impl Attribute {
    /// Returns the value with surrounding quotes removed, if it is a plain
    /// single-line string literal.
    #[must_use]
    pub fn string_literal(&self) -> Option<&str> {
        let v = self.value.trim();
        if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') && !v.contains('\n') {
            Some(&v[1..v.len() - 1])
        } else {
            None
        }
    }
}

/// A brace-delimited block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Type keyword (e.g. `resource`, `variable`, `network`).
    pub keyword: String,
    /// Header labels in order.
    pub labels: Vec<Label>,
    /// Path of this block.
    pub path: BlockPath,
    /// Path of the enclosing block, if any.
    pub parent: Option<BlockPath>,
    /// Nested blocks in source order.
    pub children: Vec<Block>,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Header line.
    pub start_line: usize,
    /// Closing line.
    pub end_line: usize,
    /// Nesting depth (0 for top-level blocks).
    pub depth: usize,
    /// Opened and closed on the header line.
    pub inline: bool,
}

impl Block {
    /// Returns the label at `index`, if present.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|l| l.value.as_str())
    }

    /// Returns the first attribute with the given name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns child blocks with the given keyword.
    pub fn children_named<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a Block> {
        self.children.iter().filter(move |b| b.keyword == keyword)
    }

    /// Attributes and child blocks merged in source order.
    #[must_use]
    pub fn items(&self) -> Vec<BodyItem<'_>> {
        merge_items(&self.attributes, &self.children)
    }

    /// Human-readable identity, e.g. `resource "aws_instance" "web"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut name = self.keyword.clone();
        for label in &self.labels {
            name.push_str(" \"");
            name.push_str(&label.value);
            name.push('"');
        }
        name
    }
}

/// An element of a block body.
#[derive(Debug, Clone, Copy)]
pub enum BodyItem<'a> {
    /// Attribute assignment.
    Attribute(&'a Attribute),
    /// Nested block.
    Block(&'a Block),
}

impl BodyItem<'_> {
    /// First line of the item.
    #[must_use]
    pub fn start_line(&self) -> usize {
        match self {
            Self::Attribute(a) => a.line,
            Self::Block(b) => b.start_line,
        }
    }

    /// Last line of the item.
    #[must_use]
    pub fn end_line(&self) -> usize {
        match self {
            Self::Attribute(a) => a.end_line,
            Self::Block(b) => b.end_line,
        }
    }
}

fn merge_items<'a>(attributes: &'a [Attribute], blocks: &'a [Block]) -> Vec<BodyItem<'a>> {
    let mut items: Vec<BodyItem<'a>> = attributes
        .iter()
        .map(BodyItem::Attribute)
        .chain(blocks.iter().map(BodyItem::Block))
        .collect();
    items.sort_by_key(BodyItem::start_line);
    items
}

/// A comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Raw text after the marker.
    pub text: String,
    /// Marker style.
    pub marker: CommentMarker,
    /// Line (1-indexed).
    pub line: usize,
    /// 1-indexed column of the marker.
    pub column: usize,
    /// The line sits inside a heredoc body and is string content.
    pub inside_heredoc: bool,
}

/// A structural problem that limits analysis of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralIssue {
    /// Heredoc without terminator.
    UnterminatedHeredoc {
        /// Introducer line.
        line: usize,
        /// Expected terminator.
        marker: String,
    },
    /// `}` with no open block.
    UnmatchedClose {
        /// Line of the stray brace.
        line: usize,
    },
    /// Block still open at end of file.
    UnclosedBlock {
        /// Header line.
        line: usize,
        /// Block display name.
        block: String,
    },
    /// `/*` without `*/`.
    UnterminatedBlockComment {
        /// Opening line.
        line: usize,
    },
    /// Brackets still open at end of file.
    UnclosedExpression {
        /// Expression start line.
        line: usize,
    },
}

impl StructuralIssue {
    /// Line the issue is reported at.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedHeredoc { line, .. }
            | Self::UnmatchedClose { line }
            | Self::UnclosedBlock { line, .. }
            | Self::UnterminatedBlockComment { line }
            | Self::UnclosedExpression { line } => *line,
        }
    }

    /// Stable rule id used when the issue is reported.
    #[must_use]
    pub fn rule_id(&self) -> &'static str {
        match self {
            Self::UnterminatedHeredoc { .. } => "PS.001",
            Self::UnmatchedClose { .. } => "PS.002",
            Self::UnclosedBlock { .. } => "PS.003",
            Self::UnterminatedBlockComment { .. } => "PS.004",
            Self::UnclosedExpression { .. } => "PS.005",
        }
    }

    /// Kebab-case name used when the issue is reported.
    #[must_use]
    pub fn rule_name(&self) -> &'static str {
        match self {
            Self::UnterminatedHeredoc { .. } => "unterminated-heredoc",
            Self::UnmatchedClose { .. } => "unmatched-closing-brace",
            Self::UnclosedBlock { .. } => "unclosed-block",
            Self::UnterminatedBlockComment { .. } => "unterminated-block-comment",
            Self::UnclosedExpression { .. } => "unclosed-expression",
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::UnterminatedHeredoc { marker, .. } => {
                format!("Heredoc is never terminated; expected a line containing only `{marker}`")
            }
            Self::UnmatchedClose { .. } => {
                "Closing brace has no matching block; the rest of the file was not analyzed"
                    .to_string()
            }
            Self::UnclosedBlock { block, .. } => format!("`{block}` is never closed"),
            Self::UnterminatedBlockComment { .. } => {
                "Block comment is never closed with `*/`".to_string()
            }
            Self::UnclosedExpression { .. } => {
                "Expression opens brackets that are never closed".to_string()
            }
        }
    }
}

/// Blank lines found between two lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlankGap {
    /// Total blank lines.
    pub total: usize,
    /// Longest run of consecutive blank lines.
    pub longest: usize,
}

/// A fully scanned and structured file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// Source lines.
    pub lines: Vec<SourceLine>,
    /// Classified spans covering every line.
    pub spans: Vec<Span>,
    /// Attributes outside any block (e.g. in `.tfvars` files).
    pub attributes: Vec<Attribute>,
    /// Top-level blocks.
    pub blocks: Vec<Block>,
    /// All comments, heredoc lines included.
    pub comments: Vec<Comment>,
    /// Structural problems.
    pub issues: Vec<StructuralIssue>,
    /// Structure was only partially recovered.
    pub partial: bool,
    /// Span kind of each line, indexed by `line - 1`.
    pub(crate) line_kinds: Vec<SpanKind>,
    /// Whether each line is heredoc content, indexed by `line - 1`.
    pub(crate) heredoc_lines: Vec<bool>,
}

impl ParsedFile {
    /// Scans and builds the model for `content`.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        crate::builder::build(content)
    }

    /// Returns the line with the given 1-indexed number.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&SourceLine> {
        index.checked_sub(1).and_then(|i| self.lines.get(i))
    }

    /// Returns the span kind of a 1-indexed line.
    #[must_use]
    pub fn line_kind(&self, index: usize) -> Option<SpanKind> {
        index
            .checked_sub(1)
            .and_then(|i| self.line_kinds.get(i))
            .copied()
    }

    /// Returns true if a 1-indexed line is heredoc content, including
    /// heredocs opened inside a multi-line expression.
    #[must_use]
    pub fn in_heredoc(&self, index: usize) -> bool {
        index
            .checked_sub(1)
            .and_then(|i| self.heredoc_lines.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Counts blank lines strictly between `after` and `before`.
    #[must_use]
    pub fn blank_gap(&self, after: usize, before: usize) -> BlankGap {
        let mut gap = BlankGap::default();
        let mut run = 0;
        for line in after + 1..before {
            if self.line_kind(line) == Some(SpanKind::Blank) {
                gap.total += 1;
                run += 1;
                gap.longest = gap.longest.max(run);
            } else {
                run = 0;
            }
        }
        gap
    }

    /// Top-level attributes and blocks merged in source order.
    #[must_use]
    pub fn items(&self) -> Vec<BodyItem<'_>> {
        merge_items(&self.attributes, &self.blocks)
    }

    /// Resolves a block path.
    #[must_use]
    pub fn block(&self, path: &BlockPath) -> Option<&Block> {
        let (first, rest) = path.segments().split_first()?;
        let mut block = self.blocks.get(*first)?;
        for index in rest {
            block = block.children.get(*index)?;
        }
        Some(block)
    }

    /// Returns the enclosing block of `block`.
    #[must_use]
    pub fn parent_of(&self, block: &Block) -> Option<&Block> {
        block.parent.as_ref().and_then(|p| self.block(p))
    }

    /// All blocks in pre-order.
    #[must_use]
    pub fn all_blocks(&self) -> Vec<&Block> {
        let mut out = Vec::new();
        let mut stack: Vec<&Block> = self.blocks.iter().rev().collect();
        while let Some(block) = stack.pop() {
            out.push(block);
            stack.extend(block.children.iter().rev());
        }
        out
    }

    /// Top-level blocks with the given keyword.
    pub fn blocks_named<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a Block> {
        self.blocks.iter().filter(move |b| b.keyword == keyword)
    }
}
