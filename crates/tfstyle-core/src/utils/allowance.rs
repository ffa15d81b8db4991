//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! # tfstyle: allow(ST.001, comment-format) reason="generated by codegen"
//! ```
//!
//! A directive applies to its own line (as a trailing comment) and, when it
//! stands alone on a comment line, to the line after it.

use crate::source::SourceLine;
use std::collections::HashSet;

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule ids or names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
    /// The directive is the only thing on its line.
    pub standalone: bool,
}

impl AllowDirective {
    /// Returns true if any of `keys` (or `all`) is listed.
    #[must_use]
    pub fn covers(&self, keys: &[&str]) -> bool {
        self.rules.contains("all") || keys.iter().any(|k| self.rules.contains(*k))
    }
}

/// Checks source lines for an allowance covering `line`.
///
/// `keys` are the identifiers the directive may use for the rule, usually
/// its id and name.
#[must_use]
pub fn check_allow_with_reason(lines: &[SourceLine], line: usize, keys: &[&str]) -> AllowCheck {
    let at = |n: usize| n.checked_sub(1).and_then(|i| lines.get(i));

    if let Some(directive) = at(line).and_then(|l| parse_allow_directive(&l.text)) {
        if directive.covers(keys) {
            return AllowCheck::Allowed {
                reason: directive.reason,
            };
        }
    }

    if let Some(directive) = at(line.saturating_sub(1))
        .filter(|_| line > 1)
        .and_then(|l| parse_allow_directive(&l.text))
    {
        if directive.standalone && directive.covers(keys) {
            return AllowCheck::Allowed {
                reason: directive.reason,
            };
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a line.
#[must_use]
pub fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let start = line.find("tfstyle:")?;
    let before = line[..start].trim_end();
    let marker = if before.ends_with("//") {
        before.len() - 2
    } else if before.ends_with('#') {
        before.len() - 1
    } else {
        return None;
    };
    let standalone = line[..marker].trim().is_empty();

    let directive = line[start + "tfstyle:".len()..].trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()))
        .filter(|r| !r.trim().is_empty());

    Some(AllowDirective {
        rules,
        reason,
        standalone,
    })
}
