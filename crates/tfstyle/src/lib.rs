//! # tfstyle
//!
//! Style and convention linter for Terraform configuration files.
//!
//! This is the facade crate: it re-exports the engine, the built-in rules,
//! and adds project discovery on top.
//!
//! ## Linting a string
//!
//! ```rust,ignore
//! use tfstyle::FileRole;
//!
//! let diagnostics = tfstyle::lint_source("main.tf", "variable region {}\n", Some(FileRole::Main));
//! for d in &diagnostics {
//!     println!("{d}");
//! }
//! ```
//!
//! ## Checking a project
//!
//! ```rust,ignore
//! use tfstyle::{run_check, CheckOptions, Config};
//!
//! let config = Config::from_file("tfstyle.toml".as_ref())?;
//! let result = run_check(&config, &CheckOptions::default())?;
//! ```

#![forbid(unsafe_code)]

use std::path::Path;
use std::sync::OnceLock;
use tracing::error;

pub use tfstyle_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use tfstyle_rules::*;
}

mod discovery;
mod runner;

pub use discovery::{classify, discover, DiscoveryError, FileFilter};
pub use runner::{
    find_project_config, load_project_config, run_check, CheckOptions, RunError, CONFIG_FILES,
};

struct Catalog {
    registry: Registry,
    selection: RuleSelection,
}

fn default_catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let registry = tfstyle_rules::registry(&Config::default()).unwrap_or_else(|e| {
            error!("Built-in catalog is inconsistent: {}", e);
            Registry::new()
        });
        let selection = registry.default_selection();
        Catalog {
            registry,
            selection,
        }
    })
}

/// The built-in catalog with default options, built once per process.
#[must_use]
pub fn default_registry() -> &'static Registry {
    &default_catalog().registry
}

/// Lints one file's contents with the default catalog and selection.
///
/// Pass the file's role when known; placement rules are skipped without it.
#[must_use]
pub fn lint_source(
    path: impl AsRef<Path>,
    content: &str,
    role: Option<FileRole>,
) -> Vec<Diagnostic> {
    let catalog = default_catalog();
    check_source(
        &catalog.registry,
        &catalog.selection,
        path.as_ref(),
        content,
        role,
    )
}
