//! Jira issue search
//!
//! Uses the Jira Cloud REST API v2 with email + API token basic auth.

use super::traits::*;
use crate::config::AtlassianConfig;
use crate::results::SearchResult;
use anyhow::Result as AnyhowResult;

/// Jira issue search engine
pub struct Jira {
    config: AtlassianConfig,
}

impl Jira {
    pub fn new(config: AtlassianConfig) -> Self {
        Self { config }
    }

    fn jql(params: &RequestParams) -> String {
        format!(
            "text ~ \"{}\" order by updated desc",
            params.quoted_query()
        )
    }
}

impl Engine for Jira {
    fn name(&self) -> &str {
        "jira"
    }

    fn display_name(&self) -> &str {
        "Jira"
    }

    fn timeout(&self) -> Option<f64> {
        self.config.timeout
    }

    fn request(&self, params: &RequestParams) -> AnyhowResult<EngineRequest> {
        let url = format!("{}/rest/api/2/search", self.config.site());

        Ok(EngineRequest::get(url)
            .param("jql", Self::jql(params))
            .param("maxResults", params.max_results.to_string())
            .param("fields", "summary,description,status")
            .basic_auth(&self.config.email, &self.config.api_token))
    }

    fn response(&self, response: EngineResponse) -> AnyhowResult<Vec<SearchResult>> {
        let json: serde_json::Value = response
            .json()
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON: {}", e))?;

        let issues = json
            .get("issues")
            .and_then(|i| i.as_array())
            .ok_or_else(|| anyhow::anyhow!("Missing issues array"))?;

        let mut results = Vec::new();

        for issue in issues {
            let key = match str_field(issue, "/key") {
                Some(key) => key,
                None => continue,
            };

            let url = format!("{}/browse/{}", self.config.site(), key);
            let title = match str_field(issue, "/fields/summary") {
                Some(summary) => format!("{}: {}", key, summary),
                None => key.to_string(),
            };

            // First line of the description, else the status
            let snippet = str_field(issue, "/fields/description")
                .and_then(|d| d.lines().map(str::trim).find(|l| !l.is_empty()))
                .or_else(|| str_field(issue, "/fields/status/name"))
                .unwrap_or_default();

            results.push(SearchResult::new(self.name(), title, url).with_snippet(snippet));
        }

        Ok(results)
    }
}
