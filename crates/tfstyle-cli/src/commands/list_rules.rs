//! List rules command implementation.

use anyhow::Result;
use std::fmt::Write;
use tfstyle::rules::Preset;
use tfstyle::{default_registry, Registry};

use crate::ListFormat;

/// Runs the list-rules command.
pub fn run(format: ListFormat) -> Result<()> {
    let registry = default_registry();
    match format {
        ListFormat::Text => print!("{}", render_text(registry)),
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&registry.descriptors())?),
    }
    Ok(())
}

fn render_text(registry: &Registry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {:<36} {:<8} Description", "Id", "Name", "Default");
    let _ = writeln!(out, "{}", "-".repeat(96));

    for d in registry.descriptors() {
        let default = if d.default_enabled {
            d.default_severity.to_string()
        } else {
            "off".to_string()
        };
        let _ = writeln!(out, "{:<8} {:<36} {:<8} {}", d.id, d.name, default, d.description);
    }

    let _ = writeln!(out, "\nPresets:");
    for (preset, note) in [
        (Preset::Recommended, "(default)"),
        (Preset::Strict, "every rule"),
        (Preset::Minimal, "security rules only"),
    ] {
        let count = preset.selection(registry).enabled_count();
        let _ = writeln!(out, "  {:<12} - {count} rules, {note}", preset.name());
    }

    let _ = writeln!(out, "\nUse --rules to run specific rules, e.g.:");
    let _ = writeln!(out, "  tfstyle check --rules ST.001,comment-format");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_rule_and_preset() {
        let text = render_text(default_registry());
        assert!(text.contains("ST.001   attribute-alignment"));
        assert!(text.contains("DC.002   comment-style                        off"));
        assert!(text.contains("SC.005   hardcoded-secret                     error"));
        assert!(text.contains("  recommended  - 20 rules, (default)"));
        assert!(text.contains("  minimal      - 5 rules, security rules only"));
    }
}
