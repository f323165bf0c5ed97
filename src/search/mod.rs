//! Search orchestration module
//!
//! Normalizes queries, runs one prefix lookup per entity kind against the
//! store and merges the shaped results.

mod error;
mod executor;
mod models;

pub use error::SearchError;
pub use executor::SearchAggregator;
pub use models::*;
