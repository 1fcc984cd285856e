//! Client configuration

use std::time::Duration;

use url::Url;

use crate::protocol::error::A2AError;

/// Gateway that hosts the agents when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://agent.supplygraph.ai/api/v1/agents";

/// Environment variable overriding the gateway base URL
pub const ENV_BASE_URL: &str = "A2A_BASE_URL";

/// Environment variable holding the gateway API key
pub const ENV_API_KEY: &str = "A2A_API_KEY";

/// Environment variable overriding the request timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "A2A_TIMEOUT_SECS";

/// Configuration for an A2A client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the agent gateway
    pub base_url: Url,

    /// API key sent as a bearer token
    pub api_key: Option<String>,

    /// Timeout for non-streaming requests
    pub timeout: Duration,

    /// Timeout for establishing a connection
    pub connect_timeout: Duration,

    /// Check responses against the envelope and manifest invariants
    ///
    /// Request preconditions are enforced regardless.
    pub validate_responses: bool,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            validate_responses: true,
        }
    }

    /// Read configuration from `A2A_BASE_URL`, `A2A_API_KEY` and `A2A_TIMEOUT_SECS`
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, A2AError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, A2AError> {
        let raw_url = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(raw_url.trim()).map_err(|e| {
            A2AError::invalid_request(format!("{} is not a valid URL: {}", ENV_BASE_URL, e))
        })?;

        let mut config = Self::new(base_url);

        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            config.api_key = Some(key.trim().to_string());
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                A2AError::invalid_request(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Enable or disable response validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }
}
