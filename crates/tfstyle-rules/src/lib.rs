//! # tfstyle-rules
//!
//! Built-in rules for tfstyle.
//!
//! ## Available Rules
//!
//! | Id | Name | Default | Description |
//! |----|------|---------|-------------|
//! | ST.001 | `attribute-alignment` | on | Aligns `=` across consecutive attributes |
//! | ST.002 | `block-separation` | on | Separates top-level blocks with a blank line |
//! | ST.003 | `excess-blank-lines-between-blocks` | on | Limits blank lines between top-level blocks |
//! | ST.004 | `repeated-block-spacing` | on | Limits blank lines between repeated nested blocks |
//! | ST.005 | `excess-blank-lines-in-block` | on | Limits blank lines inside a block |
//! | ST.006 | `indentation` | on | Two spaces per nesting level |
//! | ST.007 | `label-quoting` | on | Quotes block labels |
//! | ST.008 | `trailing-whitespace` | on | No trailing whitespace outside heredocs |
//! | ST.009 | `snake-case-names` | on | snake_case names for declared objects |
//! | ST.010 | `canonical-instance-name` | off | Canonical instance name in examples and tests |
//! | IO.001 | `variable-placement` | on | Variables only in `variables.tf` |
//! | IO.002 | `output-placement` | on | Outputs only in `outputs.tf` |
//! | IO.003 | `variable-type` | on | Variables declare a type |
//! | DC.001 | `comment-format` | on | One space after the comment marker |
//! | DC.002 | `comment-style` | off | `#` instead of `//` |
//! | DC.003 | `variable-description` | on | Variables are described |
//! | DC.004 | `output-description` | on | Outputs are described |
//! | SC.001 | `terraform-required-version` | on | Terraform version is pinned |
//! | SC.002 | `provider-version` | on | Provider versions are pinned |
//! | SC.003 | `permissive-version-constraint` | on | Constraints have an upper bound |
//! | SC.004 | `sensitive-output` | on | Secret outputs are sensitive |
//! | SC.005 | `hardcoded-secret` | on | No literal secrets |
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tfstyle_core::{Analyzer, Config};
//! use tfstyle_rules::{registry, selection_for};
//!
//! let config = Config::default();
//! let registry = registry(&config)?;
//! let analyzer = Analyzer::builder()
//!     .selection(selection_for(&config, &registry)?)
//!     .registry(Arc::new(registry))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod common;
mod presets;
#[cfg(test)]
mod testing;

pub mod attribute_alignment;
pub mod block_separation;
pub mod canonical_instance_name;
pub mod comment_format;
pub mod comment_style;
pub mod excess_blank_lines_between_blocks;
pub mod excess_blank_lines_in_block;
pub mod hardcoded_secret;
pub mod indentation;
pub mod label_quoting;
pub mod permissive_version_constraint;
pub mod placement;
pub mod provider_version;
pub mod repeated_block_spacing;
pub mod required_attribute;
pub mod sensitive_output;
pub mod snake_case_names;
pub mod trailing_whitespace;

pub use attribute_alignment::AttributeAlignment;
pub use block_separation::BlockSeparation;
pub use canonical_instance_name::CanonicalInstanceName;
pub use comment_format::CommentFormat;
pub use comment_style::CommentStyle;
pub use excess_blank_lines_between_blocks::ExcessBlankLinesBetweenBlocks;
pub use excess_blank_lines_in_block::ExcessBlankLinesInBlock;
pub use hardcoded_secret::HardcodedSecret;
pub use indentation::IndentationRule;
pub use label_quoting::LabelQuoting;
pub use permissive_version_constraint::PermissiveVersionConstraint;
pub use placement::BlockPlacement;
pub use presets::{all_rules, registry, selection_for, Preset};
pub use provider_version::ProviderVersion;
pub use repeated_block_spacing::RepeatedBlockSpacing;
pub use required_attribute::RequiredAttribute;
pub use sensitive_output::SensitiveOutput;
pub use snake_case_names::SnakeCaseNames;
pub use trailing_whitespace::TrailingWhitespace;

/// Re-export core types for convenience.
pub use tfstyle_core::{Diagnostic, Rule, Severity};
