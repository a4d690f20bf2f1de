//! Settings structures for Slack-Search configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors that make the configuration unusable at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    MissingSlackCredential(&'static str),
    #[error("invalid bind address: {0}")]
    InvalidBindAddress(String),
    #[error("timeout must be a positive, finite number of seconds, got {0}")]
    InvalidTimeout(String),
}

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub slack: SlackSettings,
    pub outgoing: OutgoingSettings,
    pub backends: BackendsSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with the process environment
    pub fn merge_env(&mut self) {
        self.merge_env_from(|key| std::env::var(key).ok());
    }

    /// Merge with variables supplied by `lookup`; blank values count as unset
    pub fn merge_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(val) = var("SLACK_BOT_TOKEN") {
            self.slack.bot_token = val;
        }
        if let Some(val) = var("SLACK_SIGNING_SECRET") {
            self.slack.signing_secret = val;
        }
        if let Some(val) = var("SLACK_COMMAND") {
            self.slack.command = Some(val);
        }
        if let Some(val) = var("SLACK_DEFERRED_RESPONSE") {
            self.slack.deferred_response = parse_bool(&val);
        }
        if let Some(val) = var("SLACK_RESPONSE_TYPE") {
            match val.as_str() {
                "in_channel" => self.slack.response_type = ResponseType::InChannel,
                "ephemeral" => self.slack.response_type = ResponseType::Ephemeral,
                other => warn!("Ignoring unknown SLACK_RESPONSE_TYPE: {}", other),
            }
        }
        if let Some(val) = var("PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid PORT: {}", val),
            }
        }
        if let Some(val) = var("BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("SEARCH_TIMEOUT") {
            match val.parse() {
                Ok(secs) => self.outgoing.request_timeout = secs,
                Err(_) => warn!("Ignoring invalid SEARCH_TIMEOUT: {}", val),
            }
        }
        if let Some(val) = var("SEARCH_MAX_RESULTS") {
            match val.parse() {
                Ok(n) => self.outgoing.max_results = n,
                Err(_) => warn!("Ignoring invalid SEARCH_MAX_RESULTS: {}", val),
            }
        }

        if let Some(token) = var("SLACK_USER_TOKEN") {
            self.backends
                .slack
                .get_or_insert_with(SlackSearchConfig::default)
                .token = token;
        }

        merge_atlassian(&mut self.backends.jira, &var, "JIRA");
        merge_atlassian(&mut self.backends.confluence, &var, "CONFLUENCE");

        if let Some(key) = var("GOOGLE_DRIVE_API_KEY") {
            self.backends
                .drive
                .get_or_insert_with(DriveConfig::default)
                .api_key = key;
        }
    }

    /// Check that the settings are enough to serve Slack requests
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.slack.bot_token.trim().is_empty() {
            return Err(ConfigError::MissingSlackCredential("SLACK_BOT_TOKEN"));
        }
        if self.slack.signing_secret.trim().is_empty() {
            return Err(ConfigError::MissingSlackCredential("SLACK_SIGNING_SECRET"));
        }
        if self.server.bind_address.parse::<std::net::IpAddr>().is_err() {
            return Err(ConfigError::InvalidBindAddress(
                self.server.bind_address.clone(),
            ));
        }
        check_timeout(Some(self.outgoing.request_timeout))?;
        check_timeout(self.outgoing.max_request_timeout)?;

        let backends = &self.backends;
        for timeout in [
            backends.slack.as_ref().and_then(|c| c.timeout),
            backends.jira.as_ref().and_then(|c| c.timeout),
            backends.confluence.as_ref().and_then(|c| c.timeout),
            backends.drive.as_ref().and_then(|c| c.timeout),
        ] {
            check_timeout(timeout)?;
        }
        Ok(())
    }
}

/// Seconds must be positive and representable as a `Duration`
fn check_timeout(secs: Option<f64>) -> std::result::Result<(), ConfigError> {
    match secs {
        Some(secs) if !(secs > 0.0) || Duration::try_from_secs_f64(secs).is_err() => {
            Err(ConfigError::InvalidTimeout(secs.to_string()))
        }
        _ => Ok(()),
    }
}

fn merge_atlassian<F>(slot: &mut Option<AtlassianConfig>, var: &F, prefix: &str)
where
    F: Fn(&str) -> Option<String>,
{
    let base_url = var(&format!("{}_BASE_URL", prefix));
    let email = var(&format!("{}_EMAIL", prefix));
    let api_token = var(&format!("{}_API_TOKEN", prefix));

    if base_url.is_none() && email.is_none() && api_token.is_none() {
        return;
    }

    let config = slot.get_or_insert_with(AtlassianConfig::default);
    if let Some(v) = base_url {
        config.base_url = v;
    }
    if let Some(v) = email {
        config.email = v;
    }
    if let Some(v) = api_token {
        config.api_token = v;
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

/// How Slack should show the reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Only visible to the user who ran the command
    #[default]
    Ephemeral,
    /// Posted to the whole channel
    InChannel,
}

/// Slack app settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSettings {
    /// Bot token (`xoxb-...`)
    pub bot_token: String,
    /// Signing secret used to verify inbound webhooks
    pub signing_secret: String,
    /// Slash command to accept; `None` accepts any
    pub command: Option<String>,
    /// Acknowledge immediately and post results to `response_url`
    pub deferred_response: bool,
    /// Visibility of the reply
    pub response_type: ResponseType,
    /// Maximum age of a signed request in seconds
    pub signature_tolerance_secs: i64,
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            signing_secret: String::new(),
            command: Some("/search".to_string()),
            deferred_response: false,
            response_type: ResponseType::Ephemeral,
            signature_tolerance_secs: 300,
        }
    }
}

/// Per-backend timeout when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Maximum request timeout
    pub max_request_timeout: Option<f64>,
    /// Results requested from each backend
    pub max_results: u32,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_TIMEOUT_SECS as f64,
            max_request_timeout: Some(30.0),
            max_results: 5,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

impl OutgoingSettings {
    /// Timeout for one backend, capped by `max_request_timeout`.
    ///
    /// Values `validate` would reject fall back to the built-in default.
    pub fn effective_timeout(&self, backend_timeout: Option<f64>) -> Duration {
        let secs = backend_timeout.unwrap_or(self.request_timeout);
        let secs = match self.max_request_timeout {
            Some(max) => secs.min(max),
            None => secs,
        };
        Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Per-backend configuration; a backend is enabled only when its entry is complete
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendsSettings {
    pub slack: Option<SlackSearchConfig>,
    pub jira: Option<AtlassianConfig>,
    pub confluence: Option<AtlassianConfig>,
    pub drive: Option<DriveConfig>,
}

impl BackendsSettings {
    pub fn slack(&self) -> Option<&SlackSearchConfig> {
        self.slack.as_ref().filter(|c| c.is_complete())
    }

    pub fn jira(&self) -> Option<&AtlassianConfig> {
        self.jira.as_ref().filter(|c| c.is_complete())
    }

    pub fn confluence(&self) -> Option<&AtlassianConfig> {
        self.confluence.as_ref().filter(|c| c.is_complete())
    }

    pub fn drive(&self) -> Option<&DriveConfig> {
        self.drive.as_ref().filter(|c| c.is_complete())
    }
}

/// Jira or Confluence Cloud site, authenticated with email + API token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlassianConfig {
    /// Site root, e.g. `https://acme.atlassian.net`
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    /// Custom timeout for this backend
    pub timeout: Option<f64>,
}

impl AtlassianConfig {
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            email: email.into(),
            api_token: api_token.into(),
            timeout: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.base_url.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.api_token.trim().is_empty()
    }

    /// Base URL without a trailing slash
    pub fn site(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

/// Google Drive, authenticated with an API key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub api_key: String,
    /// Files endpoint
    pub api_url: String,
    pub timeout: Option<f64>,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://www.googleapis.com/drive/v3/files".to_string(),
            timeout: None,
        }
    }
}

impl DriveConfig {
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_url.trim().is_empty()
    }
}

/// Slack message search; needs a user token since `search.messages` rejects bot tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSearchConfig {
    pub token: String,
    /// Web API root
    pub api_url: String,
    pub timeout: Option<f64>,
}

impl Default for SlackSearchConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: "https://slack.com/api".to_string(),
            timeout: None,
        }
    }
}

impl SlackSearchConfig {
    pub fn is_complete(&self) -> bool {
        !self.token.trim().is_empty() && !self.api_url.trim().is_empty()
    }
}
