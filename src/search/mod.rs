//! Search orchestration module
//!
//! Fans a query out to the configured backends concurrently and gathers
//! their results, bounded by per-backend timeouts.

mod executor;
mod models;

pub use executor::Search;
pub use models::*;
