//! Rule presets and catalog construction.

use crate::{
    AttributeAlignment, BlockPlacement, BlockSeparation, CanonicalInstanceName, CommentFormat,
    CommentStyle, ExcessBlankLinesBetweenBlocks, ExcessBlankLinesInBlock, HardcodedSecret,
    IndentationRule, LabelQuoting, PermissiveVersionConstraint, ProviderVersion,
    RepeatedBlockSpacing, RequiredAttribute, SensitiveOutput, SnakeCaseNames, TrailingWhitespace,
};
use tfstyle_core::{
    Category, Config, ConfigError, Registry, RegistryError, RuleBox, RuleConfig, RuleSelection,
};
use tracing::debug;

/// Preset configurations for tfstyle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    /// Every rule that is on by default.
    #[default]
    Recommended,
    /// Every rule, including those off by default.
    Strict,
    /// Security rules only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Preset name as written in configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }

    /// Returns the rule selection for this preset.
    #[must_use]
    pub fn selection(self, registry: &Registry) -> RuleSelection {
        match self {
            Self::Recommended => registry.default_selection(),
            Self::Strict => RuleSelection::all(registry),
            Self::Minimal => {
                let mut selection = RuleSelection::none();
                for rule in registry.rules() {
                    let on = rule.category() == Category::Security && rule.default_enabled();
                    selection.set_enabled(rule.id(), on);
                }
                selection
            }
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            _ => Err(ConfigError::UnknownPreset {
                name: s.to_string(),
            }),
        }
    }
}

/// Resolves the selection a config asks for: its preset (default
/// recommended) with `[rules]` sections applied on top.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] for an unrecognized preset name.
pub fn selection_for(config: &Config, registry: &Registry) -> Result<RuleSelection, ConfigError> {
    let preset = match config.preset.as_deref() {
        Some(name) => name.parse()?,
        None => Preset::default(),
    };
    let selection = config.apply(registry, preset.selection(registry));
    debug!(
        preset = preset.name(),
        enabled = selection.enabled_count(),
        "resolved rule selection"
    );
    Ok(selection)
}

fn options<'a>(config: &'a Config, id: &str, name: &str) -> Option<&'a RuleConfig> {
    config.rule_config(id, name)
}

fn max_blank_lines(config: &Config, id: &str, name: &str) -> usize {
    options(config, id, name).map_or(1, |c| c.get_count("max_blank_lines", 1))
}

fn patterns(config: &Config, id: &str, name: &str) -> Vec<String> {
    options(config, id, name)
        .map(|c| c.get_str_array("patterns"))
        .unwrap_or_default()
}

/// Returns every built-in rule in catalog order, with options from `config`.
#[must_use]
pub fn all_rules(config: &Config) -> Vec<RuleBox> {
    use crate::{
        canonical_instance_name as st010, excess_blank_lines_between_blocks as st003,
        excess_blank_lines_in_block as st005, hardcoded_secret as sc005,
        repeated_block_spacing as st004, sensitive_output as sc004,
    };

    let canonical = options(config, st010::ID, st010::NAME)
        .map_or(st010::DEFAULT_NAME, |c| c.get_str("name", st010::DEFAULT_NAME))
        .to_string();

    vec![
        Box::new(AttributeAlignment::new()),
        Box::new(BlockSeparation::new()),
        Box::new(
            ExcessBlankLinesBetweenBlocks::new()
                .max_blank_lines(max_blank_lines(config, st003::ID, st003::NAME)),
        ),
        Box::new(
            RepeatedBlockSpacing::new()
                .max_blank_lines(max_blank_lines(config, st004::ID, st004::NAME)),
        ),
        Box::new(
            ExcessBlankLinesInBlock::new()
                .max_blank_lines(max_blank_lines(config, st005::ID, st005::NAME)),
        ),
        Box::new(IndentationRule::new()),
        Box::new(LabelQuoting::new()),
        Box::new(TrailingWhitespace::new()),
        Box::new(SnakeCaseNames::new()),
        Box::new(CanonicalInstanceName::new().canonical(canonical)),
        Box::new(BlockPlacement::variables()),
        Box::new(BlockPlacement::outputs()),
        Box::new(RequiredAttribute::variable_type()),
        Box::new(CommentFormat::new()),
        Box::new(CommentStyle::new()),
        Box::new(RequiredAttribute::variable_description()),
        Box::new(RequiredAttribute::output_description()),
        Box::new(RequiredAttribute::terraform_required_version()),
        Box::new(ProviderVersion::new()),
        Box::new(PermissiveVersionConstraint::new()),
        Box::new(SensitiveOutput::new().patterns(patterns(config, sc004::ID, sc004::NAME))),
        Box::new(HardcodedSecret::new().patterns(patterns(config, sc005::ID, sc005::NAME))),
    ]
}

/// Builds the catalog with options from `config`.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateRule`] if two rules share an id or name.
pub fn registry(config: &Config) -> Result<Registry, RegistryError> {
    Registry::with_rules(all_rules(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_registers_cleanly() {
        let registry = registry(&Config::default()).unwrap();
        assert_eq!(registry.len(), 22);
        for d in registry.descriptors() {
            assert!(d.id.starts_with(d.category.prefix()), "{}", d.id);
            assert!(!d.description.is_empty(), "{}", d.id);
        }
    }

    #[test]
    fn preset_selections() {
        let registry = registry(&Config::default()).unwrap();
        let recommended = Preset::Recommended.selection(&registry);
        assert!(!recommended.is_enabled("DC.002"));
        assert!(!recommended.is_enabled("ST.010"));
        assert_eq!(recommended.enabled_count(), 20);

        assert_eq!(Preset::Strict.selection(&registry).enabled_count(), 22);

        let minimal = Preset::Minimal.selection(&registry);
        assert_eq!(minimal.enabled_count(), 5);
        assert!(minimal.is_enabled("SC.005"));
        assert!(!minimal.is_enabled("ST.001"));
    }

    #[test]
    fn config_overrides_preset() {
        let config = Config::parse(
            "preset = \"minimal\"\n[rules.comment-style]\nenabled = true\n[rules.\"SC.003\"]\nenabled = false\n",
        )
        .unwrap();
        let registry = registry(&config).unwrap();
        let selection = selection_for(&config, &registry).unwrap();
        assert!(selection.is_enabled("DC.002"));
        assert!(!selection.is_enabled("SC.003"));
        assert!(selection.is_enabled("SC.001"));
    }

    #[test]
    fn unknown_preset_rejected() {
        let config = Config::parse("preset = \"lenient\"\n").unwrap();
        let registry = registry(&config).unwrap();
        assert!(matches!(
            selection_for(&config, &registry),
            Err(ConfigError::UnknownPreset { .. })
        ));
        assert_eq!("STRICT".parse::<Preset>().unwrap(), Preset::Strict);
    }
}
