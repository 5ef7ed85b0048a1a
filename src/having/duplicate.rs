use regex::Regex;

use crate::having::{ComparisonOperator, HavingCondition};

/// Textual check for `column <op> threshold` already being in a query.
///
/// Tolerates identifier quoting, whitespace, letter case and the two
/// spellings of not-equal. It does not understand SQL: `10` and `10.0`,
/// or `c > 1` and `1 < c`, are different conditions to it.
#[derive(Debug, Clone)]
pub struct ConditionPattern {
    regex: Regex,
}

impl ConditionPattern {
    pub fn new(condition: &HavingCondition) -> Self {
        let pattern = format!(
            r"(?i)(?:^|[^\w]){}\s*{}\s*{}(?:[^\w.]|$)",
            column_pattern(condition.column()),
            operator_pattern(condition.operator()),
            regex::escape(&condition.threshold_text()),
        );

        let regex = Regex::new(&pattern).unwrap_or_else(|_| Self::never());

        Self { regex }
    }

    fn never() -> Regex {
        Regex::new(r"\b\B").expect("valid regex")
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn operator_pattern(operator: ComparisonOperator) -> String {
    if operator.is_not_equal() {
        return "(?:!=|<>)".to_string();
    }
    regex::escape(operator.symbol())
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn closing_quote(ch: char) -> Option<char> {
    match ch {
        '"' => Some('"'),
        '`' => Some('`'),
        '[' => Some(']'),
        _ => None,
    }
}

fn ident_pattern(ident: &str) -> String {
    format!(r#"["`\[]?{}["`\]]?"#, regex::escape(ident))
}

/// Each identifier in the column may or may not be quoted; punctuation may
/// be surrounded by whitespace.
fn column_pattern(column: &str) -> String {
    let chars: Vec<char> = column.chars().collect();
    let mut pattern = String::new();
    let mut position = 0;

    while position < chars.len() {
        let current = chars[position];

        if let Some(close) = closing_quote(current) {
            let start = position + 1;
            let mut end = start;
            while end < chars.len() && chars[end] != close {
                end += 1;
            }
            let ident: String = chars[start..end].iter().collect();
            pattern.push_str(&ident_pattern(&ident));
            position = end + 1;
        } else if is_ident_char(current) {
            let start = position;
            while position < chars.len() && is_ident_char(chars[position]) {
                position += 1;
            }
            let ident: String = chars[start..position].iter().collect();
            pattern.push_str(&ident_pattern(&ident));
        } else if current.is_whitespace() {
            pattern.push_str(r"\s*");
            position += 1;
        } else {
            pattern.push_str(r"\s*");
            pattern.push_str(&regex::escape(&current.to_string()));
            pattern.push_str(r"\s*");
            position += 1;
        }
    }

    pattern
}
