//! High-level client for an agent gateway

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tower::ServiceExt;
use tower_service::Service;

use crate::{
    client::{
        cache::ManifestCache, config::ClientConfig, engine::TaskEngine, run::RunRequest,
        tool::AgentTool,
    },
    codec::FrameStream,
    protocol::{envelope::Envelope, error::A2AError, manifest::Manifest, operation::A2AOperation},
    service::{A2ARequest, A2AResponse, RequestContext},
};

/// High-level client for running tasks on gateway agents
///
/// Every call is one round trip; the client keeps no task state. Clones share
/// the manifest cache.
///
/// # Example
///
/// ```rust,no_run
/// use a2a_task_client::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let client = A2AClientBuilder::from_config(ClientConfig::from_env()?)?.build()?;
///
/// let envelope = client.run("tariff_calc", "Import 100kg ice cream").await?;
/// if envelope.needs_user_input() {
///     let task_id = envelope.task_id().unwrap_or_default();
///     let reply = RunRequest::new("China").with_task_id(task_id);
///     client.run("tariff_calc", reply).await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct AgentClient<S> {
    service: S,
    config: ClientConfig,
    manifests: Arc<ManifestCache>,
}

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    /// Create a new agent client
    ///
    /// # Arguments
    ///
    /// * `service` - The Tower service that handles requests
    /// * `config` - Client configuration
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self {
            service,
            config,
            manifests: Arc::new(ManifestCache::new()),
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The manifest cache shared by this client and its clones
    pub fn manifest_cache(&self) -> &ManifestCache {
        &self.manifests
    }

    fn request(&self, agent_id: &str, operation: A2AOperation) -> A2ARequest {
        let context = RequestContext::new().with_timeout(self.config.timeout);
        A2ARequest::new(agent_id, operation, context)
    }

    async fn call(&self, agent_id: &str, operation: A2AOperation) -> Result<A2AResponse, A2AError> {
        let request = self.request(agent_id, operation);
        self.service.clone().oneshot(request).await
    }

    async fn call_envelope(
        &self,
        agent_id: &str,
        operation: A2AOperation,
    ) -> Result<Envelope, A2AError> {
        let mode = operation.mode();
        self.call(agent_id, operation)
            .await?
            .into_envelope()
            .ok_or_else(|| A2AError::decode(format!("Expected an envelope for '{}'", mode)))
    }

    /// Start a new task or continue an existing one
    ///
    /// Input without text is rejected unless it continues a task.
    pub async fn run(
        &self,
        agent_id: &str,
        request: impl Into<RunRequest>,
    ) -> Result<Envelope, A2AError> {
        self.call_envelope(agent_id, request.into().into_operation(false))
            .await
    }

    /// Start or continue a task and stream its reasoning frames
    ///
    /// The stream ends after the frame marked final; call
    /// [`results`](Self::results) afterwards for the outcome. Dropping the
    /// stream closes the connection.
    pub async fn run_stream(
        &self,
        agent_id: &str,
        request: impl Into<RunRequest>,
    ) -> Result<FrameStream, A2AError> {
        self.call(agent_id, request.into().into_operation(true))
            .await?
            .into_stream()
            .ok_or_else(|| A2AError::decode("Expected an event stream for 'run'"))
    }

    /// Query the current state of a task
    pub async fn status(&self, agent_id: &str, task_id: &str) -> Result<Envelope, A2AError> {
        let operation = A2AOperation::Status {
            task_id: task_id.to_string(),
        };
        self.call_envelope(agent_id, operation).await
    }

    /// Fetch the output of a task
    ///
    /// `data.content` is only populated once the task reports `TASK_COMPLETED`.
    pub async fn results(&self, agent_id: &str, task_id: &str) -> Result<Envelope, A2AError> {
        let operation = A2AOperation::Results {
            task_id: task_id.to_string(),
        };
        self.call_envelope(agent_id, operation).await
    }

    fn fetch_manifest(
        &self,
        agent_id: &str,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<Manifest, A2AError>> {
        let service = self.service.clone();
        let request = self.request(agent_id, A2AOperation::Manifest);
        let agent_id = agent_id.to_string();

        move || {
            async move {
                tracing::debug!(%agent_id, "Fetching manifest");
                let manifest = service
                    .oneshot(request)
                    .await?
                    .into_manifest()
                    .ok_or_else(|| A2AError::decode("Expected a manifest"))?;

                Ok(match manifest.agent_id {
                    Some(_) => manifest,
                    None => manifest.with_agent_id(agent_id),
                })
            }
            .boxed()
        }
    }

    /// Fetch an agent's manifest, served from the cache after the first call
    pub async fn manifest(&self, agent_id: &str) -> Result<Arc<Manifest>, A2AError> {
        self.manifests
            .get(agent_id, self.fetch_manifest(agent_id))
            .await
    }

    /// Fetch an agent's manifest again and replace the cached one
    pub async fn refresh_manifest(&self, agent_id: &str) -> Result<Arc<Manifest>, A2AError> {
        self.manifests
            .refresh(agent_id, self.fetch_manifest(agent_id))
            .await
    }

    /// Forget an agent's cached manifest
    pub fn invalidate_manifest(&self, agent_id: &str) {
        self.manifests.invalidate(agent_id);
    }

    /// A task engine bound to one agent
    pub fn agent(&self, agent_id: impl Into<String>) -> TaskEngine<S> {
        TaskEngine::new(self.clone(), agent_id)
    }

    /// Describe an agent as a callable tool
    pub async fn tool(&self, agent_id: &str) -> Result<AgentTool<S>, A2AError> {
        let manifest = self.manifest(agent_id).await?;
        Ok(AgentTool::new(manifest, self.agent(agent_id)))
    }
}

impl<S: Clone> Clone for AgentClient<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            config: self.config.clone(),
            manifests: self.manifests.clone(),
        }
    }
}

impl<S> std::fmt::Debug for AgentClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("manifests", &self.manifests)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use serde_json::json;
    use tokio_test::assert_ok;
    use url::Url;

    use super::*;
    use crate::{
        client::A2AClientBuilder,
        protocol::{ErrorKind, StatusCode},
        transport::{mock::MockTransport, TransportResponse},
    };

    fn client(transport: MockTransport) -> AgentClient<crate::client::A2AService> {
        let url = Url::parse("mock://gateway").unwrap();
        A2AClientBuilder::new(url)
            .with_transport(transport)
            .with_bearer_auth("sk-test")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_and_continue() {
        let transport = MockTransport::new(|req| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            let reply = match body.get("task_id") {
                None => json!({
                    "success": true,
                    "code": "WAITING_USER",
                    "message": "Which country of origin?",
                    "data": {"task_id": "tsk_1", "stage": "interpreting"}
                }),
                Some(_) => json!({
                    "success": true,
                    "code": "TASK_ACCEPTED",
                    "data": {"task_id": "tsk_1", "stage": "executing"}
                }),
            };
            TransportResponse::new(200).body(serde_json::to_vec(&reply).unwrap())
        });
        let client = client(transport.clone());

        let first = assert_ok!(client.run("tariff_calc", "Import 100kg ice cream").await);
        assert!(first.needs_user_input());
        assert_eq!(first.user_prompt().as_deref(), Some("Which country of origin?"));

        let task_id = first.task_id().unwrap();
        let second = assert_ok!(
            client
                .run("tariff_calc", RunRequest::new("China").with_task_id(task_id))
                .await
        );
        assert_eq!(second.code, StatusCode::TaskAccepted);
        assert_eq!(second.task_id(), Some("tsk_1"));
        assert_eq!(transport.last_body()["task_id"], "tsk_1");

        let sent = &transport.requests()[0];
        assert_eq!(sent.headers.get("Authorization").unwrap(), "Bearer sk-test");
    }

    #[tokio::test]
    async fn test_status_without_task_id_is_rejected_locally() {
        let transport = MockTransport::json(json!({"code": "TASK_RUNNING"}));
        let client = client(transport.clone());

        let err = client.status("tariff_calc", "").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRequest);

        let err = client.results("tariff_calc", "").await.unwrap_err();
        assert_eq!(err.message, "task_id is required");

        let err = client.run("tariff_calc", "").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRequest);

        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_manifest_is_cached() {
        let transport = MockTransport::json(json!({
            "name": "Tariff Calculator",
            "description": "Computes import duties",
            "capabilities": {"run": true, "status": true, "results": true, "streaming": true}
        }));
        let client = client(transport.clone());

        let first = assert_ok!(client.manifest("tariff_calc").await);
        let second = assert_ok!(client.clone().manifest("tariff_calc").await);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.agent_id.as_deref(), Some("tariff_calc"));
        assert_eq!(transport.calls(), 1);

        client.invalidate_manifest("tariff_calc");
        assert_ok!(client.manifest("tariff_calc").await);
        assert_eq!(transport.calls(), 2);

        assert_ok!(client.refresh_manifest("tariff_calc").await);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_run_stream() {
        let transport = MockTransport::json(json!({})).with_stream(
            200,
            &[
                "event: stream\ndata: {\"task_id\":\"tsk_1\",\"code\":\"THINKING\",\"reasoning\":[\"Looking up HS code\"]}\n\n",
                "event: stream\ndata: {\"task_id\":\"tsk_1\",\"code\":\"THINKING\",\"reasoning\":[\"Done\"],\"is_final\":true}\n\n",
            ],
        );
        let client = client(transport.clone());

        let stream = assert_ok!(client.run_stream("tariff_calc", "Import 100kg ice cream").await);
        let frames: Vec<_> = stream.collect().await;

        assert_eq!(frames.len(), 2);
        assert_eq!(transport.last_body()["stream"], true);
    }

    #[tokio::test]
    async fn test_tool_description() {
        let transport = MockTransport::json(json!({
            "name": "Tariff Calculator",
            "description": "Computes import duties"
        }));
        let client = client(transport);

        let tool = assert_ok!(client.tool("tariff_calc").await);
        assert_eq!(tool.name, "Tariff Calculator");
        assert_eq!(tool.agent_id, "tariff_calc");
        assert_eq!(tool.engine.agent_id(), "tariff_calc");
    }
}
