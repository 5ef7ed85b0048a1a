pub mod inserter_config;
pub use inserter_config::*;
