//! Application state shared across handlers

use crate::config::Settings;
use crate::engines::EngineRegistry;
use crate::network::HttpClient;
use crate::search::Search;
use crate::slack::SignatureVerifier;
use crate::summary::Summarizer;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search executor
    pub search: Arc<Search>,
    /// Inbound request verifier
    pub verifier: SignatureVerifier,
    /// Topic extractor
    pub summarizer: Summarizer,
    /// Client used for deferred replies to `response_url`
    pub client: HttpClient,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, registry: EngineRegistry, client: HttpClient) -> Self {
        let verifier = SignatureVerifier::new(
            settings.slack.signing_secret.clone(),
            settings.slack.signature_tolerance_secs,
        );
        let search = Search::new(client.clone(), Arc::new(registry))
            .with_outgoing(settings.outgoing.clone());

        Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
            verifier,
            summarizer: Summarizer::default(),
            client,
        }
    }

    /// Names of the configured backends
    pub fn backend_names(&self) -> Vec<String> {
        self.search
            .registry()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
