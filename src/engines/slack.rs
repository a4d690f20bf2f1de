//! Slack message search
//!
//! Uses the `search.messages` Web API method, which only accepts user tokens.

use super::traits::*;
use crate::config::SlackSearchConfig;
use crate::results::{EngineError, SearchResult};
use anyhow::Result as AnyhowResult;

const TITLE_CHARS: usize = 80;

/// Slack message search engine
pub struct SlackMessages {
    config: SlackSearchConfig,
}

impl SlackMessages {
    pub fn new(config: SlackSearchConfig) -> Self {
        Self { config }
    }
}

fn first_line(text: &str) -> String {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    if line.chars().count() > TITLE_CHARS {
        let cut: String = line.chars().take(TITLE_CHARS).collect();
        format!("{}…", cut.trim_end())
    } else {
        line.to_string()
    }
}

impl Engine for SlackMessages {
    fn name(&self) -> &str {
        "slack"
    }

    fn display_name(&self) -> &str {
        "Slack"
    }

    fn timeout(&self) -> Option<f64> {
        self.config.timeout
    }

    fn request(&self, params: &RequestParams) -> AnyhowResult<EngineRequest> {
        let url = format!(
            "{}/search.messages",
            self.config.api_url.trim().trim_end_matches('/')
        );

        Ok(EngineRequest::get(url)
            .param("query", &params.query)
            .param("count", params.max_results.to_string())
            .bearer_auth(&self.config.token))
    }

    fn response(&self, response: EngineResponse) -> AnyhowResult<Vec<SearchResult>> {
        let json: serde_json::Value = response
            .json()
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON: {}", e))?;

        // Slack reports failures as 200 with ok=false
        if json.get("ok").and_then(|o| o.as_bool()) != Some(true) {
            let reason = str_field(&json, "/error").unwrap_or("unknown_error");
            return Err(EngineError::ApiError(reason.to_string()).into());
        }

        let matches = json
            .pointer("/messages/matches")
            .and_then(|m| m.as_array())
            .cloned()
            .unwrap_or_default();

        let mut results = Vec::new();

        for item in &matches {
            let url = match str_field(item, "/permalink") {
                Some(link) => link,
                None => continue,
            };

            let title = match str_field(item, "/text") {
                Some(text) => first_line(text),
                None => "(no text)".to_string(),
            };

            let snippet = match (
                str_field(item, "/username"),
                str_field(item, "/channel/name"),
            ) {
                (Some(user), Some(channel)) => format!("@{} in #{}", user, channel),
                (None, Some(channel)) => format!("in #{}", channel),
                (Some(user), None) => format!("@{}", user),
                (None, None) => String::new(),
            };

            results.push(SearchResult::new(self.name(), title, url).with_snippet(snippet));
        }

        Ok(results)
    }
}
