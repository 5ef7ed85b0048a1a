use once_cell::sync::Lazy;
use regex::Regex;

use crate::having::{Advisory, ConditionPattern, HavingCondition, HavingInsertion, InsertionPath};

static HAVING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bhaving\b").expect("valid regex"));
static GROUP_BY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bgroup\s+by\b").expect("valid regex"));
static ORDER_BY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\border\s+by\b").expect("valid regex"));
static LIMIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\blimit\b").expect("valid regex"));
static OFFSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\boffset\b").expect("valid regex"));
static SUB_SELECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\(\s*select\b").expect("valid regex"));

/// Best-effort HAVING insertion on the raw text.
///
/// Always targets the outermost query and writes the column exactly as the
/// caller gave it. Clause keywords are only recognized outside quotes and
/// parentheses.
pub fn insert_textual(query: &str, condition: &HavingCondition) -> HavingInsertion {
    let trimmed = query.trim();
    let (body, terminator) = match trimmed.strip_suffix(';') {
        Some(body) => (body.trim_end(), ";"),
        None => (trimmed, ""),
    };
    let outer = outer_text(body);

    let mut advisories = vec![];
    if SUB_SELECT.is_match(body) {
        advisories.push(Advisory::SubqueryDetected);
    }
    if !GROUP_BY.is_match(&outer) {
        advisories.push(Advisory::MissingGroupBy);
    }

    let fragment = condition.to_sql_fragment();

    let sql = match HAVING.find(&outer) {
        Some(having) => {
            let splice = splice_point(&outer, having.end());
            if ConditionPattern::new(condition).is_match(&body[having.start()..splice]) {
                return HavingInsertion::new(query.to_string(), InsertionPath::Fallback)
                    .with_advisories(advisories)
                    .with_already_present();
            }
            splice_at(body, splice, &format!("AND {}", fragment))
        },
        None => {
            let splice = splice_point(&outer, 0);
            splice_at(body, splice, &format!("HAVING {}", fragment))
        },
    };

    HavingInsertion::new(format!("{}{}", sql, terminator), InsertionPath::Fallback).with_advisories(advisories)
}

/// Start of the earliest ORDER BY, LIMIT or OFFSET at or after `from`; end
/// of text when there is none.
fn splice_point(outer: &str, from: usize) -> usize {
    [&ORDER_BY, &LIMIT, &OFFSET]
        .into_iter()
        .filter_map(|keyword| keyword.find_at(outer, from).map(|found| found.start()))
        .min()
        .unwrap_or(outer.len())
}

/// `body` with quoted text and everything inside parentheses blanked out.
/// Byte offsets are the same as in `body`.
fn outer_text(body: &str) -> String {
    let mut outer = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in body.chars() {
        let hidden = match quote {
            Some(open) => {
                if ch == open {
                    quote = None;
                }
                true
            },
            None => match ch {
                '\'' | '"' | '`' => {
                    quote = Some(ch);
                    true
                },
                '(' => {
                    depth += 1;
                    true
                },
                ')' => {
                    depth = depth.saturating_sub(1);
                    true
                },
                _ => depth > 0,
            },
        };

        if hidden {
            outer.extend(std::iter::repeat_n(' ', ch.len_utf8()));
        } else {
            outer.push(ch);
        }
    }

    outer
}

fn splice_at(body: &str, position: usize, clause: &str) -> String {
    let head = body[..position].trim_end();
    let tail = body[position..].trim_start();

    if tail.is_empty() {
        format!("{} {}", head, clause)
    } else {
        format!("{} {} {}", head, clause, tail)
    }
}
