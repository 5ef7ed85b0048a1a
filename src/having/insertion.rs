use crate::having::Advisory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPath {
    /// Parsed, mutated and regenerated.
    Structural,
    /// Spliced into the text.
    Fallback,
}

/// Outcome of one HAVING insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct HavingInsertion {
    pub sql: String,
    pub path: InsertionPath,
    /// The condition was found in the query and nothing was added.
    pub already_present: bool,
    pub advisories: Vec<Advisory>,
}

impl HavingInsertion {
    pub fn new(sql: String, path: InsertionPath) -> Self {
        Self {
            sql,
            path,
            already_present: false,
            advisories: vec![],
        }
    }

    pub fn with_advisories(mut self, advisories: Vec<Advisory>) -> Self {
        self.advisories = advisories;
        self
    }

    pub fn with_already_present(mut self) -> Self {
        self.already_present = true;
        self
    }
}
