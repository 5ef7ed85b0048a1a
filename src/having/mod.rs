pub mod insert_error;
pub use insert_error::*;

pub mod operators;
pub use operators::*;

pub mod condition;
pub use condition::*;

pub mod advisory;
pub use advisory::*;

pub mod duplicate;
pub use duplicate::*;

pub mod insertion;
pub use insertion::*;

pub mod structural;
pub use structural::*;

pub mod fallback;
pub use fallback::*;

pub mod inserter;
pub use inserter::*;
