//! # tfstyle-core
//!
//! Parsing and rule-evaluation engine for Terraform configuration files.
//!
//! This crate turns raw text into a structural model and runs rules over it:
//!
//! - [`source`] splits text into [`SourceLine`]s with byte ranges
//! - [`scanner`] classifies every line into ordered, non-overlapping spans
//! - [`ParsedFile`] holds the block tree, attributes, and comments
//! - [`Rule`] and [`Registry`] define and dispatch checks
//! - [`Analyzer`] runs files on a worker pool and collects [`Diagnostic`]s
//!
//! The scanner never evaluates expressions. Malformed input degrades to a
//! partial model plus `PS.*` diagnostics rather than an error.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tfstyle_core::{Analyzer, Registry};
//!
//! let analyzer = Analyzer::builder()
//!     .registry(Arc::new(Registry::with_rules(my_rules())?))
//!     .build()?;
//!
//! for diagnostic in analyzer.lint_source("main.tf".as_ref(), content, None) {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod builder;
mod config;
mod context;
mod model;
mod registry;
mod rule;
mod types;

pub mod scanner;
pub mod source;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{
    check_source, Analyzer, AnalyzerBuilder, AnalyzerError, CancellationToken, FileInput,
    UNREADABLE_FILE_ID, UNREADABLE_FILE_NAME,
};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, FileRole};
pub use model::{
    Attribute, BlankGap, Block, BlockPath, BodyItem, Comment, ParsedFile, StructuralIssue,
};
pub use registry::{
    Registry, RegistryError, RuleSelection, RULE_INTERNAL_ERROR_ID, RULE_INTERNAL_ERROR_NAME,
};
pub use rule::{Category, Rule, RuleBox, RuleDescriptor, RuleError};
pub use scanner::{CommentMarker, Label, Span, SpanKind};
pub use source::{Indentation, SourceLine};
pub use types::{Diagnostic, DiagnosticReport, LintResult, Location, Severity, Suggestion};
pub use utils::allowance::AllowCheck;
