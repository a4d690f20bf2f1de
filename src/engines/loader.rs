//! Engine loader for building the registry from configuration

use super::registry::EngineRegistry;
use super::{confluence, drive, jira, slack};
use crate::config::Settings;
use std::sync::Arc;
use tracing::{debug, info};

/// Loader for initializing engines from configuration
pub struct EngineLoader;

impl EngineLoader {
    /// Register every backend whose configuration is complete.
    ///
    /// Incomplete or absent backends are skipped, never an error.
    pub fn load(settings: &Settings) -> EngineRegistry {
        let mut registry = EngineRegistry::new();
        let backends = &settings.backends;

        match backends.slack() {
            Some(config) => {
                registry.register(Arc::new(slack::SlackMessages::new(config.clone())));
                info!("Loaded engine: slack");
            }
            None => debug!("Slack message search not configured"),
        }

        match backends.jira() {
            Some(config) => {
                registry.register(Arc::new(jira::Jira::new(config.clone())));
                info!("Loaded engine: jira ({})", config.site());
            }
            None => debug!("Jira not configured"),
        }

        match backends.confluence() {
            Some(config) => {
                registry.register(Arc::new(confluence::Confluence::new(config.clone())));
                info!("Loaded engine: confluence ({})", config.site());
            }
            None => debug!("Confluence not configured"),
        }

        match backends.drive() {
            Some(config) => {
                registry.register(Arc::new(drive::Drive::new(config.clone())));
                info!("Loaded engine: drive");
            }
            None => debug!("Google Drive not configured"),
        }

        info!("Loaded {} engines", registry.len());
        registry
    }
}
