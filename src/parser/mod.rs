pub mod parse_error;
pub use parse_error::*;

pub mod sql_statement;
pub use sql_statement::*;

pub mod predicate;
pub use predicate::*;

pub mod identifier_quoter;
pub use identifier_quoter::*;

pub mod keyword_normalizer;
pub use keyword_normalizer::*;

pub mod backend;
pub use backend::*;
