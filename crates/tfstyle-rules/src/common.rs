//! Text helpers shared by several rules.

use tfstyle_core::{FileContext, RuleError};

/// Name fragments that mark a value as secret.
pub(crate) const SECRET_MARKERS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "private_key",
    "api_key",
    "apikey",
    "access_key",
    "credential",
];

/// Suffixes naming metadata about a secret rather than the secret itself.
const NON_SECRET_SUFFIXES: &[&str] = &[
    "_arn", "_id", "_ids", "_name", "_names", "_version", "_length", "_path", "_type", "_ttl",
];

/// Returns true if `name` looks like it holds secret material.
pub(crate) fn is_secret_name(name: &str, extra: &[String]) -> bool {
    let lower = name.to_ascii_lowercase();
    if NON_SECRET_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return false;
    }
    SECRET_MARKERS.iter().any(|m| lower.contains(m))
        || extra.iter().any(|m| lower.contains(&m.to_ascii_lowercase()))
}

/// Returns true for `^[a-z][a-z0-9_]*$`.
pub(crate) fn is_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// A `key = value` assignment found by [`find_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyHit {
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column of the value.
    pub value_column: usize,
    /// Contents of the value if it is a quoted string.
    pub string: Option<String>,
}

/// Finds the first `key = ...` assignment between two lines, inclusive.
///
/// Used for object-valued attributes whose keys are not separate
/// attributes in the model.
///
/// # Errors
///
/// Returns [`RuleError`] if a line in the range is missing.
pub(crate) fn find_key(
    ctx: &FileContext,
    first: usize,
    last: usize,
    key: &str,
) -> Result<Option<KeyHit>, RuleError> {
    for number in first..=last {
        let line = ctx.line(number).ok_or_else(|| RuleError::missing_line(number))?;
        if let Some((value_start, string)) = key_in_text(&line.text, key) {
            return Ok(Some(KeyHit {
                line: number,
                value_column: line.text[..value_start].chars().count() + 1,
                string,
            }));
        }
    }
    Ok(None)
}

/// Locates `key = ` in `text`, returning the value's byte offset and, for
/// a quoted value, its contents.
fn key_in_text(text: &str, key: &str) -> Option<(usize, Option<String>)> {
    let mut search = 0;
    while let Some(found) = text[search..].find(key) {
        let start = search + found;
        let end = start + key.len();
        search = end;

        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '-' || c == '"'));
        if !before_ok {
            continue;
        }
        let rest = &text[end..];
        let after_ws = rest.trim_start();
        let Some(value) = after_ws.strip_prefix('=') else {
            continue;
        };
        if value.starts_with('=') {
            continue;
        }
        let value_trimmed = value.trim_start();
        let value_start = text.len() - value_trimmed.len();
        let string = value_trimmed
            .strip_prefix('"')
            .and_then(|v| v.find('"').map(|q| v[..q].to_string()));
        return Some((value_start, string));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tfstyle_core::source::split_lines;

    #[test]
    fn snake_case() {
        assert!(is_snake_case("web_server_1"));
        assert!(!is_snake_case("WebServer"));
        assert!(!is_snake_case("web-server"));
        assert!(!is_snake_case("1web"));
        assert!(!is_snake_case("_web"));
        assert!(!is_snake_case(""));
    }

    #[test]
    fn secret_names() {
        assert!(is_secret_name("db_password", &[]));
        assert!(is_secret_name("GithubToken", &[]));
        assert!(!is_secret_name("secret_arn", &[]));
        assert!(!is_secret_name("instance_type", &[]));
        assert!(is_secret_name("signing_pem", &["pem".to_string()]));
    }

    #[test]
    fn finds_keys_in_objects() {
        let content = "aws = {\n  source  = \"hashicorp/aws\"\n  version = \"~> 5.0\"\n}\n";
        let lines = split_lines(content);
        let ctx = FileContext::new(Path::new("versions.tf"), content, None, &lines);

        let hit = find_key(&ctx, 1, 4, "version").unwrap().unwrap();
        assert_eq!(hit.line, 3);
        assert_eq!(hit.value_column, 13);
        assert_eq!(hit.string.as_deref(), Some("~> 5.0"));

        assert!(find_key(&ctx, 1, 4, "configuration_aliases").unwrap().is_none());
        assert!(find_key(&ctx, 1, 9, "missing").is_err());
    }

    #[test]
    fn key_match_respects_word_boundaries() {
        assert!(key_in_text("min_version = 1", "version").is_none());
        assert!(key_in_text("version == 1", "version").is_none());
        let (_, s) = key_in_text("{ source = \"x\", version = \"1.0\" }", "version").unwrap();
        assert_eq!(s.as_deref(), Some("1.0"));
    }
}
