//! Web server module
//!
//! Receives Slack slash commands and exposes a health endpoint.

mod handlers;
mod routes;
mod state;

pub use routes::{create_router, SLASH_COMMAND_PATH};
pub use state::AppState;
