//! Client builder for constructing A2A clients with composable layers

use std::{sync::Arc, time::Duration};

use tower::{util::BoxCloneSyncService, ServiceBuilder};
use url::Url;

use crate::{
    client::{AgentClient, ClientConfig},
    codec::{Codec, JsonCodec},
    layer::{A2AValidationLayer, AuthCredentials, AuthLayer},
    protocol::error::A2AError,
    service::{A2AProtocolService, A2ARequest, A2AResponse},
    transport::{HttpTransport, Transport},
};

/// The assembled service stack behind an [`AgentClient`]
pub type A2AService = BoxCloneSyncService<A2ARequest, A2AResponse, A2AError>;

/// Builder for constructing A2A clients
///
/// This builder provides a fluent API for configuring and building an A2A client
/// with customizable transport, authentication, timeouts, and validation.
///
/// # Example
///
/// ```rust,no_run
/// use a2a_task_client::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), A2AError> {
/// let url = "https://agent.supplygraph.ai/api/v1/agents".parse().unwrap();
/// let client = A2AClientBuilder::new_http(url)
///     .with_bearer_auth("sk-live-123")
///     .with_timeout(Duration::from_secs(90))
///     .build()?;
///
/// let manifest = client.manifest("tariff_calc").await?;
/// println!("Connected to: {}", manifest.name);
/// # Ok(())
/// # }
/// ```
///
/// # Compiler Error
/// This will fail to compile if it is not clear to the compiler which type
/// implementing `Transport` is being used as underlying transport. This is
/// expected behaviour.
///
/// ```compile_fail
/// let client = a2a_task_client::client::A2AClientBuilder::new(base_url()).build();
/// ```
pub struct A2AClientBuilder<T: Transport> {
    config: ClientConfig,
    transport: Option<T>,
    codec: Option<Arc<dyn Codec>>,
    auth: Option<AuthCredentials>,
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Start a builder for a custom transport
    ///
    /// # Arguments
    ///
    /// * `base_url` - The gateway base URL, recorded in the client config
    pub fn new(base_url: Url) -> Self {
        Self {
            config: ClientConfig::new(base_url),
            transport: None,
            codec: None,
            auth: None,
        }
    }

    /// Use a custom transport
    ///
    /// # Arguments
    ///
    /// * `transport` - The transport implementation to use
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom codec
    ///
    /// # Arguments
    ///
    /// * `codec` - The codec implementation to use
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Enable bearer token authentication
    ///
    /// # Arguments
    ///
    /// * `token` - The gateway API key
    pub fn with_bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(AuthCredentials::bearer(token));
        self
    }

    /// Enable API key authentication
    ///
    /// # Arguments
    ///
    /// * `key` - The API key
    /// * `header` - The header name for the API key (e.g., "X-API-Key")
    pub fn with_api_key_auth(mut self, key: impl Into<String>, header: impl Into<String>) -> Self {
        self.auth = Some(AuthCredentials::api_key(key, header));
        self
    }

    /// Set custom authentication credentials
    pub fn with_auth(mut self, credentials: AuthCredentials) -> Self {
        self.auth = Some(credentials);
        self
    }

    /// Set the timeout for non-streaming requests
    ///
    /// # Arguments
    ///
    /// * `timeout` - The timeout duration for requests (default: 60s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Enable or disable the validation layer
    ///
    /// Request preconditions (a `task_id` for `status`/`results`, text or a
    /// `task_id` for `run`) are always enforced before the transport. This
    /// switch only controls the response checks of [`A2AValidationLayer`].
    ///
    /// # Arguments
    ///
    /// * `enabled` - Whether to check responses against the envelope and manifest invariants (default: true)
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.config.validate_responses = enabled;
        self
    }

    /// Build the A2A client
    ///
    /// Validation wraps authentication, which wraps the protocol service.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport has been configured.
    pub fn build(self) -> Result<AgentClient<A2AService>, A2AError> {
        let transport = self.transport.ok_or_else(|| {
            A2AError::invalid_request("Transport not configured. Call new_http() or with_transport()")
        })?;

        let codec = self.codec.unwrap_or_else(|| Arc::new(JsonCodec));

        let mut service = A2AService::new(A2AProtocolService::new(transport, codec));

        if let Some(credentials) = self.auth {
            service = A2AService::new(
                ServiceBuilder::new()
                    .layer(AuthLayer::new(credentials))
                    .service(service),
            );
        }

        if self.config.validate_responses {
            service = A2AService::new(
                ServiceBuilder::new()
                    .layer(A2AValidationLayer::new())
                    .service(service),
            );
        }

        tracing::debug!(
            base_url = %self.config.base_url,
            validate = self.config.validate_responses,
            "Built A2A client"
        );

        Ok(AgentClient::new(service, self.config))
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Create a new client builder with HTTP transport
    ///
    /// # Arguments
    ///
    /// * `base_url` - The gateway base URL (e.g., "<https://agent.supplygraph.ai/api/v1/agents>")
    pub fn new_http(base_url: Url) -> Self {
        let transport = HttpTransport::new(base_url.clone());
        Self {
            config: ClientConfig::new(base_url),
            transport: Some(transport),
            codec: Some(Arc::new(JsonCodec)),
            auth: None,
        }
    }

    /// Create an HTTP client builder from a configuration
    ///
    /// A configured API key becomes bearer authentication.
    pub fn from_config(config: ClientConfig) -> Result<Self, A2AError> {
        let transport =
            HttpTransport::with_connect_timeout(config.base_url.clone(), config.connect_timeout)?;
        let auth = config.api_key.clone().map(AuthCredentials::bearer);

        Ok(Self {
            config,
            transport: Some(transport),
            codec: Some(Arc::new(JsonCodec)),
            auth,
        })
    }
}
