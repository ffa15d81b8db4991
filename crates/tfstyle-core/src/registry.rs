//! Rule catalog and dispatch.

use crate::context::FileContext;
use crate::model::ParsedFile;
use crate::rule::{Rule, RuleBox, RuleDescriptor};
use crate::types::{Diagnostic, Severity, Suggestion};
use crate::utils::allowance::check_allow_with_reason;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Reserved id for a rule that failed or panicked.
pub const RULE_INTERNAL_ERROR_ID: &str = "RI.001";
/// Reserved name for a rule that failed or panicked.
pub const RULE_INTERNAL_ERROR_NAME: &str = "rule-internal-error";

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A rule id or name is already taken.
    #[error("rule `{key}` is already registered")]
    DuplicateRule {
        /// The conflicting id or name.
        key: String,
    },
}

/// Ordered collection of rules, addressable by id or name.
///
/// Built once, then shared read-only (typically behind an `Arc`).
#[derive(Default)]
pub struct Registry {
    rules: Vec<RuleBox>,
    index: HashMap<&'static str, usize>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.id()))
            .finish()
    }
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRule`] if the id or name is taken.
    pub fn register(&mut self, rule: RuleBox) -> Result<(), RegistryError> {
        for key in [rule.id(), rule.name()] {
            if self.index.contains_key(key) {
                return Err(RegistryError::DuplicateRule {
                    key: key.to_string(),
                });
            }
        }
        let position = self.rules.len();
        self.index.insert(rule.id(), position);
        self.index.insert(rule.name(), position);
        self.rules.push(rule);
        Ok(())
    }

    /// Builds a registry from rules, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRule`] on the first conflict.
    pub fn with_rules<I>(rules: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = RuleBox>,
    {
        let mut registry = Self::new();
        for rule in rules {
            registry.register(rule)?;
        }
        Ok(registry)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Looks up a rule by id or name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&dyn Rule> {
        self.index.get(key).map(|&i| self.rules[i].as_ref())
    }

    /// Resolves an id or name to the rule's id.
    #[must_use]
    pub fn resolve_id(&self, key: &str) -> Option<&'static str> {
        self.get(key).map(Rule::id)
    }

    /// Rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Describes every rule in registration order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<RuleDescriptor> {
        self.rules().map(RuleDescriptor::of).collect()
    }

    /// Selection with each rule's default enablement.
    #[must_use]
    pub fn default_selection(&self) -> RuleSelection {
        let mut selection = RuleSelection::none();
        for rule in self.rules() {
            selection.set_enabled(rule.id(), rule.default_enabled());
        }
        selection
    }

    /// Runs every enabled rule over one file.
    ///
    /// Rules run in registration order. A rule that returns an error or
    /// panics contributes a single `RI.001` diagnostic and evaluation moves
    /// on. Inline allow directives are honored here.
    #[must_use]
    pub fn evaluate(
        &self,
        ctx: &FileContext,
        file: &ParsedFile,
        selection: &RuleSelection,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for rule in self.rules() {
            if !selection.is_enabled(rule.id()) {
                debug!("Skipping disabled rule: {}", rule.id());
                continue;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.check(ctx, file)));
            let found = match outcome {
                Ok(Ok(found)) => found,
                Ok(Err(err)) => {
                    warn!(rule = rule.id(), path = %ctx.path.display(), "rule failed: {err}");
                    diagnostics.push(internal_error(ctx, rule, &err.to_string()));
                    continue;
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(rule = rule.id(), path = %ctx.path.display(), "rule panicked: {message}");
                    diagnostics.push(internal_error(ctx, rule, &message));
                    continue;
                }
            };

            let severity = selection.severity_override(rule.id());
            for mut diagnostic in found {
                if let Some(severity) = severity {
                    diagnostic.severity = severity;
                }
                match allowance(ctx, rule, &diagnostic) {
                    Allowance::None => diagnostics.push(diagnostic),
                    Allowance::Suppressed => {}
                    Allowance::MissingReason => {
                        diagnostics.push(missing_reason(ctx, rule, &diagnostic));
                    }
                }
            }
        }

        diagnostics
    }
}

/// Which rules run and at what severity.
///
/// An explicit value threaded into [`Registry::evaluate`]; never global.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSelection {
    enabled: HashSet<String>,
    severities: HashMap<String, Severity>,
}

impl RuleSelection {
    /// Selection with nothing enabled.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Selection with every registered rule enabled.
    #[must_use]
    pub fn all(registry: &Registry) -> Self {
        let mut selection = Self::none();
        for rule in registry.rules() {
            selection.set_enabled(rule.id(), true);
        }
        selection
    }

    /// Enables or disables a rule by id.
    pub fn set_enabled(&mut self, id: impl Into<String>, enabled: bool) {
        let id = id.into();
        if enabled {
            self.enabled.insert(id);
        } else {
            self.enabled.remove(&id);
        }
    }

    /// Overrides the severity of a rule's diagnostics.
    pub fn set_severity(&mut self, id: impl Into<String>, severity: Severity) {
        self.severities.insert(id.into(), severity);
    }

    /// Returns true if the rule with this id runs.
    #[must_use]
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.contains(id)
    }

    /// Severity override for a rule, if any.
    #[must_use]
    pub fn severity_override(&self, id: &str) -> Option<Severity> {
        self.severities.get(id).copied()
    }

    /// Number of enabled rules.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }

    /// Keeps only the listed rules enabled.
    ///
    /// Returns the keys that matched no registered rule.
    pub fn restrict_to<'k>(&mut self, registry: &Registry, keys: &[&'k str]) -> Vec<&'k str> {
        let mut unknown = Vec::new();
        let mut keep = HashSet::new();
        for key in keys {
            match registry.resolve_id(key) {
                Some(id) => {
                    keep.insert(id.to_string());
                }
                None => unknown.push(*key),
            }
        }
        self.enabled = keep;
        unknown
    }
}

enum Allowance {
    None,
    Suppressed,
    MissingReason,
}

fn allowance(ctx: &FileContext, rule: &dyn Rule, diagnostic: &Diagnostic) -> Allowance {
    let check = check_allow_with_reason(ctx.lines, diagnostic.line(), &[rule.id(), rule.name()]);
    if !check.is_allowed() {
        return Allowance::None;
    }
    if rule.requires_allow_reason() && check.reason().is_none() {
        Allowance::MissingReason
    } else {
        Allowance::Suppressed
    }
}

fn missing_reason(ctx: &FileContext, rule: &dyn Rule, diagnostic: &Diagnostic) -> Diagnostic {
    Diagnostic::new(
        rule.id(),
        rule.name(),
        Severity::Warning,
        ctx.location(diagnostic.line(), diagnostic.location.column),
        format!("Allow directive for `{}` is missing a reason", rule.id()),
    )
    .with_suggestion(Suggestion::new(format!(
        "Add a reason: # tfstyle: allow({}) reason=\"...\"",
        rule.id()
    )))
}

fn internal_error(ctx: &FileContext, rule: &dyn Rule, message: &str) -> Diagnostic {
    Diagnostic::new(
        RULE_INTERNAL_ERROR_ID,
        RULE_INTERNAL_ERROR_NAME,
        Severity::Error,
        ctx.location(1, 1),
        format!("Rule {} ({}) failed: {message}", rule.id(), rule.name()),
    )
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
