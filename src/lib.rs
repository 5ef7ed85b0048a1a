pub mod config;
pub use config::InserterConfig;

pub mod parser;

pub mod having;
pub use having::{add_having_condition, ComparisonOperator, HavingClauseInserter, HavingCondition, HavingInsertion, InsertError, InsertionPath};
