use std::fmt::{self, Display};

use sqlparser::ast::{SetExpr, Statement};

/// Reasons the structural path gives up on a query.
///
/// These never leave the crate: every variant sends the inserter down the
/// textual fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralParseFailure {
    /// The parser rejected the text.
    Rejected { message: String, text: String },
    /// More than one statement was supplied.
    MultipleStatements(usize),
    /// UNION / INTERSECT / EXCEPT at the top level.
    SetOperation,
    /// Parsed, but not a plain SELECT.
    UnsupportedStatement(String),
    /// Regenerating SQL from the tree failed.
    Generate(String),
}

impl StructuralParseFailure {
    pub fn rejected(message: &str, text: &str) -> Self {
        Self::Rejected {
            message: message.to_string(),
            text: text.to_string(),
        }
    }

    pub fn err<T>(self) -> Result<T, StructuralParseFailure> {
        Err(self)
    }

    /// Explains why a list of statements cannot be handled structurally.
    pub fn for_statements(statements: &[Statement]) -> Self {
        if statements.len() != 1 {
            return Self::MultipleStatements(statements.len());
        }

        match &statements[0] {
            Statement::Query(query) => match query.body.as_ref() {
                SetExpr::SetOperation { .. } => Self::SetOperation,
                other => Self::UnsupportedStatement(format!("query body '{}'", other)),
            },
            other => Self::UnsupportedStatement(statement_kind(other)),
        }
    }
}

fn statement_kind(statement: &Statement) -> String {
    let text = statement.to_string();
    text.split_whitespace().next().unwrap_or("statement").to_uppercase()
}

impl Display for StructuralParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { message, text } => write!(f, "StructuralParseFailure: {}\n  at -> '{}'", message, text),
            Self::MultipleStatements(count) => write!(f, "StructuralParseFailure: {} statements, expected one", count),
            Self::SetOperation => write!(f, "StructuralParseFailure: set operation queries are not rewritten structurally"),
            Self::UnsupportedStatement(kind) => write!(f, "StructuralParseFailure: unsupported statement {}", kind),
            Self::Generate(message) => write!(f, "StructuralParseFailure: generate failed: {}", message),
        }
    }
}

impl std::error::Error for StructuralParseFailure {}
