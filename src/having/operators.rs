use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlparser::ast::BinaryOperator;

use crate::having::InsertError;

/// Comparison accepted for a threshold condition.
///
/// `!=` and `<>` are the same comparison; both spellings are kept so the
/// textual fallback writes back what the caller asked for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ComparisonOperator {
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<>")]
    NotEqAnsi,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 7] = [
        ComparisonOperator::GtEq,
        ComparisonOperator::LtEq,
        ComparisonOperator::Gt,
        ComparisonOperator::Lt,
        ComparisonOperator::Eq,
        ComparisonOperator::NotEq,
        ComparisonOperator::NotEqAnsi,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::GtEq => ">=",
            ComparisonOperator::LtEq => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Eq => "=",
            ComparisonOperator::NotEq => "!=",
            ComparisonOperator::NotEqAnsi => "<>",
        }
    }

    pub fn is_not_equal(&self) -> bool {
        matches!(self, ComparisonOperator::NotEq | ComparisonOperator::NotEqAnsi)
    }

    pub fn to_binary_operator(self) -> BinaryOperator {
        match self {
            ComparisonOperator::GtEq => BinaryOperator::GtEq,
            ComparisonOperator::LtEq => BinaryOperator::LtEq,
            ComparisonOperator::Gt => BinaryOperator::Gt,
            ComparisonOperator::Lt => BinaryOperator::Lt,
            ComparisonOperator::Eq => BinaryOperator::Eq,
            ComparisonOperator::NotEq | ComparisonOperator::NotEqAnsi => BinaryOperator::NotEq,
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = InsertError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        ComparisonOperator::ALL
            .into_iter()
            .find(|op| op.symbol() == value)
            .ok_or_else(|| InsertError::InvalidInput(format!("Unsupported comparison operator '{}'", value)))
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Debug for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComparisonOperator({})", self)
    }
}
