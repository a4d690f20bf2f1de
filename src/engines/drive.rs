//! Google Drive file search
//!
//! Uses the Drive v3 files API with an API key passed as a query parameter.

use super::traits::*;
use crate::config::DriveConfig;
use crate::results::SearchResult;
use anyhow::Result as AnyhowResult;

/// Google Drive search engine
pub struct Drive {
    config: DriveConfig,
}

impl Drive {
    pub fn new(config: DriveConfig) -> Self {
        Self { config }
    }

    fn drive_query(params: &RequestParams) -> String {
        let escaped = params.query.replace('\\', "\\\\").replace('\'', "\\'");
        format!("name contains '{}' and trashed = false", escaped)
    }
}

/// Human readable label for a Drive MIME type
fn mime_label(mime: &str) -> &str {
    match mime {
        "application/vnd.google-apps.document" => "Google Doc",
        "application/vnd.google-apps.spreadsheet" => "Google Sheet",
        "application/vnd.google-apps.presentation" => "Google Slides",
        "application/vnd.google-apps.folder" => "Folder",
        "application/pdf" => "PDF",
        other => other,
    }
}

impl Engine for Drive {
    fn name(&self) -> &str {
        "drive"
    }

    fn display_name(&self) -> &str {
        "Google Drive"
    }

    fn timeout(&self) -> Option<f64> {
        self.config.timeout
    }

    fn request(&self, params: &RequestParams) -> AnyhowResult<EngineRequest> {
        Ok(EngineRequest::get(self.config.api_url.trim())
            .param("q", Self::drive_query(params))
            .param("pageSize", params.max_results.to_string())
            .param("fields", "files(id,name,mimeType,webViewLink)")
            .param("key", &self.config.api_key))
    }

    fn response(&self, response: EngineResponse) -> AnyhowResult<Vec<SearchResult>> {
        let json: serde_json::Value = response
            .json()
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON: {}", e))?;

        let files = json
            .get("files")
            .and_then(|f| f.as_array())
            .ok_or_else(|| anyhow::anyhow!("Missing files array"))?;

        let mut results = Vec::new();

        for file in files {
            let url = match str_field(file, "/webViewLink") {
                Some(link) => link.to_string(),
                None => match str_field(file, "/id") {
                    Some(id) => format!("https://drive.google.com/open?id={}", id),
                    None => continue,
                },
            };

            let title = str_field(file, "/name").unwrap_or("(untitled)");
            let snippet = str_field(file, "/mimeType").map(mime_label).unwrap_or_default();

            results.push(SearchResult::new(self.name(), title, url).with_snippet(snippet));
        }

        Ok(results)
    }
}
