//! Search query model

use crate::query::ParsedQuery;
use serde::{Deserialize, Serialize};

/// Complete search query with all parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search query string
    pub query: String,
    /// Language hint
    pub lang: Option<String>,
    /// Backends to search; empty means every configured backend
    pub engines: Vec<String>,
    /// Results requested from each backend
    pub max_results: u32,
}

impl SearchQuery {
    /// Create a search query from parsed slash command text
    pub fn from_parsed(parsed: ParsedQuery) -> Self {
        Self {
            query: parsed.query,
            lang: parsed.lang,
            engines: parsed.engines,
            max_results: 5,
        }
    }

    /// Create a simple query for a single string
    pub fn simple(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            lang: None,
            engines: vec![],
            max_results: 5,
        }
    }

    /// Restrict the search to one more backend
    pub fn add_engine(&mut self, name: impl Into<String>) {
        self.engines.push(name.into());
    }

    /// Set results per backend
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Check if query is empty
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_query() {
        let query = SearchQuery::simple("hello world");
        assert_eq!(query.query, "hello world");
        assert_eq!(query.max_results, 5);
        assert!(query.engines.is_empty());
    }

    #[test]
    fn test_from_parsed() {
        let parsed = ParsedQuery::parse(":fr !jira deploy");
        let query = SearchQuery::from_parsed(parsed).with_max_results(0);

        assert_eq!(query.query, "deploy");
        assert_eq!(query.lang.as_deref(), Some("fr"));
        assert_eq!(query.engines, vec!["jira"]);
        assert_eq!(query.max_results, 1);
    }

    #[test]
    fn test_query_builder() {
        let mut query = SearchQuery::simple("  ");
        query.add_engine("drive");

        assert!(query.is_empty());
        assert_eq!(query.lang, None);
        assert_eq!(query.engines, vec!["drive"]);
    }
}
