//! HTTP client for backend APIs and Slack response URLs

use crate::config::OutgoingSettings;
use crate::engines::{Auth, EngineRequest, EngineResponse, HttpMethod};
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;

/// User agent sent with every outgoing request
pub const USER_AGENT: &str = concat!("slack-search/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper with Slack-Search configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let default_timeout = settings.effective_timeout(None);
        let mut builder = Client::builder()
            .pool_max_idle_per_host(settings.pool_maxsize)
            .user_agent(USER_AGENT)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout,
        })
    }

    /// Execute an engine request
    pub async fn execute(&self, request: EngineRequest) -> Result<EngineResponse> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Execute an engine request with custom timeout, overriding the default
    pub async fn execute_with_timeout(
        &self,
        request: EngineRequest,
        timeout: Duration,
    ) -> Result<EngineResponse> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .timeout(timeout)
            .header("Accept", "application/json");

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        req_builder = match request.auth {
            Some(Auth::Basic { username, password }) => {
                req_builder.basic_auth(username, Some(password))
            }
            Some(Auth::Bearer(token)) => req_builder.bearer_auth(token),
            None => req_builder,
        };

        if let Some(body) = request.body {
            req_builder = req_builder.json(&body);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// POST with JSON body
    pub async fn post_json(&self, url: &str, json: serde_json::Value) -> Result<EngineResponse> {
        let request = EngineRequest::post(url).json(json);
        self.execute(request).await
    }

    /// Parse response into EngineResponse
    async fn parse_response(response: Response) -> Result<EngineResponse> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;

        Ok(EngineResponse { status, text, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_execute_sends_params_and_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "deploy"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = EngineRequest::get(format!("{}/search", server.uri()))
            .param("q", "deploy")
            .basic_auth("me@example.com", "token");
        let response = client.execute(request).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.text, "{}");
    }

    #[tokio::test]
    async fn test_custom_timeout_outlasts_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_millis(600)),
            )
            .mount(&server)
            .await;

        let settings = OutgoingSettings {
            request_timeout: 0.2,
            ..OutgoingSettings::default()
        };
        let client = HttpClient::with_settings(&settings).unwrap();
        let url = format!("{}/slow", server.uri());

        assert!(client.execute(EngineRequest::get(url.clone())).await.is_err());

        let response = client
            .execute_with_timeout(EngineRequest::get(url), Duration::from_secs(3))
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_post_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("authorization", "Bearer xoxb-1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = EngineRequest::post(format!("{}/hook", server.uri()))
            .bearer_auth("xoxb-1")
            .json(serde_json::json!({"text": "hi"}));
        let response = client.execute(request).await.unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }
}
