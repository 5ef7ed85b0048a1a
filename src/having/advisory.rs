use std::fmt;

use crate::having::HavingCondition;

/// Non-fatal observation made while inserting a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Advisory {
    /// No GROUP BY: the HAVING clause filters the single implicit group.
    MissingGroupBy,
    /// The textual fallback saw a sub-select and targeted the outermost query.
    SubqueryDetected,
}

impl Advisory {
    pub fn emit(&self, condition: &HavingCondition) {
        tracing::warn!(
            advisory = ?self,
            column = condition.column(),
            "{}", self
        );
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MissingGroupBy => write!(f, "HAVING added to a query without GROUP BY; it applies to a single aggregate group"),
            Advisory::SubqueryDetected => write!(f, "query contains a sub-select; HAVING was placed on the outermost query"),
        }
    }
}
