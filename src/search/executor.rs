//! Search execution and orchestration

use super::models::SearchQuery;
use crate::config::OutgoingSettings;
use crate::engines::{Engine, EngineRegistry, RequestParams};
use crate::network::HttpClient;
use crate::results::{Aggregate, EngineError, SourceResults};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Search executor that fans a query out to the configured backends
pub struct Search {
    /// HTTP client for making requests
    client: HttpClient,
    /// Engine registry
    registry: Arc<EngineRegistry>,
    /// Timeouts and result limits
    outgoing: OutgoingSettings,
}

impl Search {
    /// Create a new search executor
    pub fn new(client: HttpClient, registry: Arc<EngineRegistry>) -> Self {
        Self {
            client,
            registry,
            outgoing: OutgoingSettings::default(),
        }
    }

    /// Use the given outgoing settings for timeouts
    pub fn with_outgoing(mut self, outgoing: OutgoingSettings) -> Self {
        self.outgoing = outgoing;
        self
    }

    /// The backends this executor can query
    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Execute a search query across the selected backends.
    ///
    /// Never fails: a backend that errors or times out contributes an empty group.
    pub async fn execute(&self, query: &SearchQuery) -> Aggregate {
        let mut aggregate = Aggregate::new(query.query.clone());

        if query.is_empty() {
            return aggregate;
        }

        let engines = self.registry.select(&query.engines);

        let params = RequestParams::new(query.query.clone()).with_max_results(query.max_results);

        let futures: Vec<_> = engines
            .into_iter()
            .map(|engine| self.search_engine(engine, &params))
            .collect();

        info!(
            "Executing search '{}' (lang: {:?}) on {} engines",
            query.query,
            query.lang,
            futures.len()
        );

        // join_all keeps input order, which is registry order
        aggregate.extend(join_all(futures).await);

        for unresponsive in aggregate.unresponsive() {
            warn!(
                "Engine {} returned no results: {}",
                unresponsive.name, unresponsive.error
            );
        }

        aggregate
    }

    /// Search a single engine
    async fn search_engine(
        &self,
        engine: Arc<dyn Engine>,
        params: &RequestParams,
    ) -> SourceResults {
        let name = engine.name().to_string();
        let display_name = engine.display_name().to_string();
        let start = Instant::now();

        let engine_timeout = self.outgoing.effective_timeout(engine.timeout());

        debug!("Searching engine {} with timeout {:?}", name, engine_timeout);

        let result = timeout(
            engine_timeout,
            engine.search(&self.client, params, engine_timeout),
        )
        .await;
        let elapsed = start.elapsed().as_millis() as u64;

        let source = match result {
            Ok(Ok(results)) => {
                debug!(
                    "Engine {} returned {} results in {}ms",
                    name,
                    results.len(),
                    elapsed
                );
                SourceResults::ok(name, display_name, results)
            }
            Ok(Err(error)) => SourceResults::failed(name, display_name, error),
            Err(_) => SourceResults::failed(name, display_name, EngineError::Timeout),
        };

        source.with_time_ms(elapsed)
    }
}
