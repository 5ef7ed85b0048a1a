use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlparser::dialect::dialect_from_str;

use crate::having::InsertError;

const SUPPORTED_QUOTES: [char; 3] = ['"', '`', '['];

/// Configuration for a [`HavingClauseInserter`](crate::having::HavingClauseInserter).
///
/// - `dialect` selects the SQL dialect used to parse incoming queries.
/// - `identifier_quote` is the quote style written around identifiers in
///   regenerated SQL.
/// - `normalize_default_keyword` renames the reserved word `default` before
///   parsing and restores it afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InserterConfig {
    /// Dialect name understood by `sqlparser` (`postgresql`, `generic`, `mysql`, ...)
    pub dialect: String,
    /// Quote character for regenerated identifiers
    pub identifier_quote: char,
    /// Whether `default` is renamed around the parse boundary
    pub normalize_default_keyword: bool,
}

impl Default for InserterConfig {
    fn default() -> Self {
        Self {
            dialect: "postgresql".to_string(),
            identifier_quote: '"',
            normalize_default_keyword: true,
        }
    }
}

impl InserterConfig {
    /// Create default configuration (PostgreSQL, double-quoted identifiers).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with an explicit dialect and quote character.
    pub fn from(dialect: &str, identifier_quote: char) -> Self {
        Self {
            dialect: dialect.to_string(),
            identifier_quote,
            ..Default::default()
        }
    }

    /// Convenience: PostgreSQL parsing with double-quoted output.
    pub fn postgres() -> Self {
        Self::from("postgresql", '"')
    }

    /// Convenience: permissive generic parsing with double-quoted output.
    pub fn generic() -> Self {
        Self::from("generic", '"')
    }

    pub fn with_default_keyword_normalization(mut self, enabled: bool) -> Self {
        self.normalize_default_keyword = enabled;
        self
    }

    /// Parse a configuration from a JSON document. Missing fields keep
    /// their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, InsertError> {
        let config = serde_json::from_str::<InserterConfig>(text)
            .map_err(|err| InsertError::InvalidInput(format!("Invalid inserter config: {}", err)))?;
        config.validate()?;

        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_file(file_path: &Path) -> Result<Self, InsertError> {
        let file_content = std::fs::read_to_string(file_path)
            .map_err(|err| InsertError::InvalidInput(format!("Failed to read {}: {}", file_path.display(), err)))?;

        Self::from_json_str(&file_content)
    }

    /// Checks that the configured parser capability exists.
    pub fn validate(&self) -> Result<(), InsertError> {
        if dialect_from_str(&self.dialect).is_none() {
            return InsertError::InvalidInput(format!("Unsupported SQL dialect '{}'", self.dialect)).err();
        }

        if !SUPPORTED_QUOTES.contains(&self.identifier_quote) {
            return InsertError::InvalidInput(
                format!("Unsupported identifier quote '{}'", self.identifier_quote)
            ).err();
        }

        Ok(())
    }
}
