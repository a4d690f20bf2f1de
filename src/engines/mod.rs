//! Search backend module
//!
//! Defines the Engine trait and provides a registry for the configured backends.

mod loader;
mod registry;
mod traits;

// Engine implementations
pub mod confluence;
pub mod drive;
pub mod jira;
pub mod slack;

pub use loader::EngineLoader;
pub use registry::EngineRegistry;
pub use traits::*;
