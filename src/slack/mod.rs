//! Slack integration
//!
//! Request signature checks, slash command decoding and reply rendering.

mod command;
pub mod message;
mod signature;

pub use command::{CommandParseError, SlashCommand};
pub use message::SlackMessage;
pub use signature::{SignatureError, SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};
