//! Per-request aggregate of backend results

use super::types::*;
use serde::Serialize;

/// Everything one backend contributed to a search
#[derive(Debug, Clone, Serialize)]
pub struct SourceResults {
    /// Backend name (`jira`, `confluence`, ...)
    pub source: String,
    /// Heading shown in Slack
    pub display_name: String,
    /// Results in the backend's relevance order
    pub results: Vec<SearchResult>,
    /// Why the backend contributed nothing, if it failed
    pub error: Option<EngineError>,
    /// Response time in milliseconds
    pub time_ms: u64,
}

impl SourceResults {
    pub fn ok(
        source: impl Into<String>,
        display_name: impl Into<String>,
        results: Vec<SearchResult>,
    ) -> Self {
        Self {
            source: source.into(),
            display_name: display_name.into(),
            results,
            error: None,
            time_ms: 0,
        }
    }

    /// A failed backend counts as an empty result set
    pub fn failed(
        source: impl Into<String>,
        display_name: impl Into<String>,
        error: EngineError,
    ) -> Self {
        Self {
            source: source.into(),
            display_name: display_name.into(),
            results: Vec::new(),
            error: Some(error),
            time_ms: 0,
        }
    }

    pub fn with_time_ms(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Results of one search, grouped by source in dispatch order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregate {
    query: String,
    sources: Vec<SourceResults>,
}

impl Aggregate {
    /// Create an empty aggregate for `query`
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sources: Vec::new(),
        }
    }

    /// Append a source group; order of calls is display order
    pub fn push(&mut self, source: SourceResults) {
        self.sources.push(source);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sources(&self) -> &[SourceResults] {
        &self.sources
    }

    /// Look up the group for one backend
    pub fn source(&self, name: &str) -> Option<&SourceResults> {
        self.sources.iter().find(|s| s.source == name)
    }

    /// True when no backend was queried at all
    pub fn no_sources(&self) -> bool {
        self.sources.is_empty()
    }

    /// True when at least one backend returned something
    pub fn has_results(&self) -> bool {
        self.sources.iter().any(|s| !s.is_empty())
    }

    /// Total results across all sources
    pub fn result_count(&self) -> usize {
        self.sources.iter().map(|s| s.results.len()).sum()
    }

    /// All results, grouped by source
    pub fn results(&self) -> impl Iterator<Item = &SearchResult> {
        self.sources.iter().flat_map(|s| s.results.iter())
    }

    /// Backends that failed during this search
    pub fn unresponsive(&self) -> Vec<UnresponsiveEngine> {
        self.sources
            .iter()
            .filter_map(|s| {
                s.error.clone().map(|error| UnresponsiveEngine {
                    name: s.source.clone(),
                    error,
                })
            })
            .collect()
    }
}

impl Extend<SourceResults> for Aggregate {
    fn extend<T: IntoIterator<Item = SourceResults>>(&mut self, iter: T) {
        self.sources.extend(iter);
    }
}
