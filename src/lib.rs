//! Slack-Search: a Slack slash command that searches the team's tools
//!
//! A `/search` command fans out to Jira, Confluence, Google Drive and Slack
//! message search concurrently, then replies with grouped, linked results and
//! a short list of recurring topics.

pub mod config;
pub mod engines;
pub mod network;
pub mod query;
pub mod results;
pub mod search;
pub mod slack;
pub mod summary;
pub mod web;

pub use config::Settings;
pub use engines::Engine;
pub use results::{Aggregate, SearchResult};
pub use search::{Search, SearchQuery};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
