//! Result type definitions

use serde::{Deserialize, Serialize};

/// A single normalized search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Backend that returned this result
    pub source: String,
    /// The title of the result
    pub title: String,
    /// The URL of the result
    pub url: String,
    /// Content snippet/description
    pub snippet: Option<String>,
}

impl SearchResult {
    /// Create a new result
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            url: url.into(),
            snippet: None,
        }
    }

    /// Add a snippet, ignoring blank text
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        let snippet = snippet.into();
        let trimmed = snippet.trim();
        if !trimmed.is_empty() {
            self.snippet = Some(trimmed.to_string());
        }
        self
    }
}

/// Backend error types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineError {
    Timeout,
    NetworkError,
    HttpError(u16),
    ParseError,
    AccessDenied,
    TooManyRequests,
    /// The API answered 2xx but reported a failure in its body
    ApiError(String),
    Unknown,
}

impl EngineError {
    /// Classify a non-2xx status code
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::AccessDenied,
            429 => Self::TooManyRequests,
            _ => Self::HttpError(status),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "Request timed out"),
            Self::NetworkError => write!(f, "Network error"),
            Self::HttpError(code) => write!(f, "HTTP error: {}", code),
            Self::ParseError => write!(f, "Failed to parse response"),
            Self::AccessDenied => write!(f, "Access denied"),
            Self::TooManyRequests => write!(f, "Too many requests"),
            Self::ApiError(reason) => write!(f, "API error: {}", reason),
            Self::Unknown => write!(f, "Unknown error"),
        }
    }
}

impl std::error::Error for EngineError {}

/// An unresponsive backend record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresponsiveEngine {
    pub name: String,
    pub error: EngineError,
}
