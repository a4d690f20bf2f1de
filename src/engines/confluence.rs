//! Confluence page search
//!
//! Uses the Confluence Cloud CQL search API with email + API token basic auth.

use super::traits::*;
use crate::config::AtlassianConfig;
use crate::results::SearchResult;
use anyhow::Result as AnyhowResult;

/// Confluence search engine
pub struct Confluence {
    config: AtlassianConfig,
}

impl Confluence {
    pub fn new(config: AtlassianConfig) -> Self {
        Self { config }
    }

    fn link(&self, base: Option<&str>, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match base {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => format!("{}/wiki{}", self.config.site(), path),
        }
    }
}

/// Remove Confluence highlight markers and collapse whitespace
fn clean_excerpt(excerpt: &str) -> String {
    excerpt
        .replace("@@@hl@@@", "")
        .replace("@@@endhl@@@", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl Engine for Confluence {
    fn name(&self) -> &str {
        "confluence"
    }

    fn display_name(&self) -> &str {
        "Confluence"
    }

    fn timeout(&self) -> Option<f64> {
        self.config.timeout
    }

    fn request(&self, params: &RequestParams) -> AnyhowResult<EngineRequest> {
        let url = format!("{}/wiki/rest/api/search", self.config.site());

        Ok(EngineRequest::get(url)
            .param("cql", format!("text ~ \"{}\"", params.quoted_query()))
            .param("limit", params.max_results.to_string())
            .basic_auth(&self.config.email, &self.config.api_token))
    }

    fn response(&self, response: EngineResponse) -> AnyhowResult<Vec<SearchResult>> {
        let json: serde_json::Value = response
            .json()
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON: {}", e))?;

        let items = json
            .get("results")
            .and_then(|r| r.as_array())
            .ok_or_else(|| anyhow::anyhow!("Missing results array"))?;

        let base = str_field(&json, "/_links/base");
        let mut results = Vec::new();

        for item in items {
            let path = match str_field(item, "/url")
                .or_else(|| str_field(item, "/content/_links/webui"))
            {
                Some(path) => path,
                None => continue,
            };

            let title = str_field(item, "/title")
                .or_else(|| str_field(item, "/content/title"))
                .unwrap_or("(untitled)");

            let snippet = str_field(item, "/excerpt")
                .map(clean_excerpt)
                .unwrap_or_default();

            results.push(
                SearchResult::new(self.name(), clean_excerpt(title), self.link(base, path))
                    .with_snippet(snippet),
            );
        }

        Ok(results)
    }
}
