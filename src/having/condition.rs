use std::fmt;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::having::{ComparisonOperator, InsertError};

/// A validated `column <operator> threshold` triple.
///
/// Construction is the only place inputs are checked; once built, a
/// condition always has a non-empty column and a finite threshold.
#[derive(Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "HavingConditionPayload", into = "HavingConditionPayload")]
pub struct HavingCondition {
    column: String,
    operator: ComparisonOperator,
    threshold: NotNan<f64>,
}

/// Wire shape of a condition as sent by the alert configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HavingConditionPayload {
    pub column: String,
    pub operator: String,
    pub threshold: f64,
}

impl HavingCondition {
    pub fn new(column: &str, operator: &str, threshold: f64) -> Result<Self, InsertError> {
        let operator = operator.parse::<ComparisonOperator>()?;
        Self::with_operator(column, operator, threshold)
    }

    pub fn with_operator(column: &str, operator: ComparisonOperator, threshold: f64) -> Result<Self, InsertError> {
        let column = column.trim();
        if column.is_empty() {
            return InsertError::invalid("Column must not be empty").err();
        }

        let threshold = NotNan::new(threshold)
            .ok()
            .filter(|threshold| threshold.is_finite())
            .ok_or_else(|| InsertError::InvalidInput(format!("Threshold must be a finite number, got {}", threshold)))?;

        Ok(Self {
            column: column.to_string(),
            operator,
            threshold,
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.into_inner()
    }

    pub fn threshold_value(&self) -> NotNan<f64> {
        self.threshold
    }

    /// Threshold as a SQL numeric literal: `10`, `2.5`, `-0.75`.
    pub fn threshold_text(&self) -> String {
        format_threshold(self.threshold())
    }

    /// `column operator threshold`, with the column written as given.
    pub fn to_sql_fragment(&self) -> String {
        format!("{} {} {}", self.column, self.operator, self.threshold_text())
    }
}

pub fn format_threshold(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

impl TryFrom<HavingConditionPayload> for HavingCondition {
    type Error = InsertError;

    fn try_from(raw: HavingConditionPayload) -> Result<Self, Self::Error> {
        HavingCondition::new(&raw.column, &raw.operator, raw.threshold)
    }
}

impl From<HavingCondition> for HavingConditionPayload {
    fn from(condition: HavingCondition) -> Self {
        Self {
            operator: condition.operator.symbol().to_string(),
            threshold: condition.threshold(),
            column: condition.column,
        }
    }
}

impl fmt::Display for HavingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql_fragment())
    }
}

impl fmt::Debug for HavingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HavingCondition({})", self)
    }
}
