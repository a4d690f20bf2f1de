//! HTTP networking module
//!
//! Provides HTTP client functionality for talking to search backends and Slack.

mod client;

pub use client::{HttpClient, USER_AGENT};
