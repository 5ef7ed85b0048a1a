use std::fmt::{self, Display};

/// Error returned to callers of the HAVING inserter.
///
/// Only caller misuse is reported; anything that goes wrong after the
/// inputs were accepted is recovered internally.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertError {
    InvalidInput(String),
}

impl InsertError {
    pub fn invalid(message: &str) -> Self {
        InsertError::InvalidInput(message.to_string())
    }

    pub fn err<T>(self) -> Result<T, InsertError> {
        Err(self)
    }

    pub fn message(&self) -> &str {
        match self {
            InsertError::InvalidInput(message) => message,
        }
    }
}

impl Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::InvalidInput(message) => write!(f, "InvalidInput: {}", message),
        }
    }
}

impl std::error::Error for InsertError {}
