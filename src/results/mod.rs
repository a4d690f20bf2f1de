//! Result types and the per-request aggregate
//!
//! Every backend's response is normalized into [`SearchResult`] and grouped
//! by source in an [`Aggregate`].

mod container;
mod types;

pub use container::{Aggregate, SourceResults};
pub use types::*;
