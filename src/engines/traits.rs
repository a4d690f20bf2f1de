//! Engine traits and types

use crate::network::HttpClient;
use crate::results::{EngineError, SearchResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Parameters for building a search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestParams {
    /// Search query string
    pub query: String,
    /// Number of results to ask for
    pub max_results: u32,
}

impl RequestParams {
    /// Create new request parameters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: 5,
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Query with double quotes escaped, for JQL/CQL string literals
    pub fn quoted_query(&self) -> String {
        self.query.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

/// Credentials attached to an outgoing request
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    Basic { username: String, password: String },
    Bearer(String),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => write!(f, "Basic({}, ***)", username),
            Self::Bearer(_) => write!(f, "Bearer(***)"),
        }
    }
}

/// HTTP request to be made by the engine
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// Credentials
    pub auth: Option<Auth>,
    /// JSON body
    pub body: Option<serde_json::Value>,
}

impl EngineRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::with_method(url, HttpMethod::Get)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::with_method(url, HttpMethod::Post)
    }

    fn with_method(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            params: HashMap::new(),
            auth: None,
            body: None,
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Use HTTP basic auth
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Auth::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Use a bearer token
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::Bearer(token.into()));
        self
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.body = Some(data);
        self
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP response from engine request
#[derive(Debug)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl EngineResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A search backend
#[async_trait]
pub trait Engine: Send + Sync {
    /// Engine name, used in bangs and logs
    fn name(&self) -> &str;

    /// Heading shown above this engine's results
    fn display_name(&self) -> &str;

    /// Timeout in seconds; `None` uses the outgoing default
    fn timeout(&self) -> Option<f64> {
        None
    }

    /// Build the HTTP request for a search
    fn request(&self, params: &RequestParams) -> anyhow::Result<EngineRequest>;

    /// Parse a successful HTTP response into results, in relevance order
    fn response(&self, response: EngineResponse) -> anyhow::Result<Vec<SearchResult>>;

    /// Run one search within `timeout`: build, send, check status, parse
    async fn search(
        &self,
        client: &HttpClient,
        params: &RequestParams,
        timeout: Duration,
    ) -> Result<Vec<SearchResult>, EngineError> {
        let request = self.request(params).map_err(|e| {
            tracing::error!("Failed to build request for {}: {}", self.name(), e);
            EngineError::Unknown
        })?;

        let response = client
            .execute_with_timeout(request, timeout)
            .await
            .map_err(|e| {
                tracing::warn!("Request failed for {}: {}", self.name(), e);
                match e.downcast_ref::<reqwest::Error>() {
                    Some(err) if err.is_timeout() => EngineError::Timeout,
                    _ => EngineError::NetworkError,
                }
            })?;

        if !response.is_success() {
            return Err(EngineError::from_status(response.status));
        }

        self.response(response).map_err(|e| {
            tracing::warn!("Failed to parse response from {}: {}", self.name(), e);
            e.downcast_ref::<EngineError>()
                .cloned()
                .unwrap_or(EngineError::ParseError)
        })
    }
}

/// Read a string field, treating missing, null and blank as absent
pub(crate) fn str_field<'a>(value: &'a serde_json::Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
