use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdefault\b").expect("valid regex"));
static DEFAULT_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdefault1\b").expect("valid regex"));

const PLACEHOLDER: &str = "default1";

/// Renames the whole word `default` to `default1` so it parses as a plain
/// identifier (a stream or table named `default` is common).
///
/// Works on a copy; the caller's text is never touched. Returns the text
/// unchanged when it already contains `default1`, since the rename could
/// not be undone unambiguously.
pub fn normalize_default_keyword(sql: &str) -> Cow<'_, str> {
    if DEFAULT_PLACEHOLDER.is_match(sql) {
        return Cow::Borrowed(sql);
    }

    DEFAULT_WORD.replace_all(sql, PLACEHOLDER)
}

/// Undoes [`normalize_default_keyword`] on regenerated SQL.
pub fn restore_default_keyword(sql: &str) -> Cow<'_, str> {
    DEFAULT_PLACEHOLDER.replace_all(sql, "default")
}

/// True when `normalize_default_keyword` would rewrite the text.
pub fn needs_default_normalization(sql: &str) -> bool {
    DEFAULT_WORD.is_match(sql) && !contains_default_placeholder(sql)
}

pub fn contains_default_placeholder(text: &str) -> bool {
    DEFAULT_PLACEHOLDER.is_match(text)
}
