//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "tfstyle.toml";

const DEFAULT_CONFIG: &str = r#"# tfstyle configuration

# Starting rule set: "recommended", "strict" or "minimal"
preset = "recommended"

# Lowest severity that makes `tfstyle check` exit non-zero
fail_on = "error"

[analyzer]
include = ["**/*.tf"]
exclude = [
    "**/.terraform/**",
]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per core)
# parallelism = 4

# Rule configurations, keyed by id or name.
# Each rule can be enabled/disabled and have its severity overridden.

[rules."ST.004"]
# Blank lines allowed between repeated nested blocks
max_blank_lines = 1

# [rules.canonical-instance-name]
# enabled = true
# name = "this"

# [rules.hardcoded-secret]
# patterns = ["pem"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let path = write_config(Path::new("."), force)?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: tfstyle check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
