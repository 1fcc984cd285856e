//! Task lifecycle engine bound to one agent

use std::sync::Arc;

use tower_service::Service;

use crate::{
    client::{agent::AgentClient, run::RunRequest},
    codec::FrameStream,
    protocol::{envelope::Envelope, error::A2AError, manifest::Manifest, status::StatusCode},
    service::{A2ARequest, A2AResponse},
};

/// Drives tasks on a single agent
///
/// The engine holds no task state: the caller threads the `task_id` from one
/// call into the next and decides when to poll. Independent tasks can run
/// concurrently on one engine.
pub struct TaskEngine<S> {
    client: AgentClient<S>,
    agent_id: Arc<str>,
}

impl<S> TaskEngine<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    pub(crate) fn new(client: AgentClient<S>, agent_id: impl Into<String>) -> Self {
        Self {
            client,
            agent_id: Arc::from(agent_id.into()),
        }
    }

    /// The agent this engine drives
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Start a new task or continue an existing one
    pub async fn run(&self, request: impl Into<RunRequest>) -> Result<Envelope, A2AError> {
        self.client.run(&self.agent_id, request).await
    }

    /// Start or continue a task and stream its reasoning frames
    pub async fn run_stream(&self, request: impl Into<RunRequest>) -> Result<FrameStream, A2AError> {
        self.client.run_stream(&self.agent_id, request).await
    }

    /// Query the current state of a task
    pub async fn status(&self, task_id: &str) -> Result<Envelope, A2AError> {
        self.client.status(&self.agent_id, task_id).await
    }

    /// Fetch the output of a task
    pub async fn results(&self, task_id: &str) -> Result<Envelope, A2AError> {
        self.client.results(&self.agent_id, task_id).await
    }

    /// The agent's manifest, cached
    pub async fn manifest(&self) -> Result<Arc<Manifest>, A2AError> {
        self.client.manifest(&self.agent_id).await
    }

    /// Whether the agent is waiting for more input on this code
    pub fn needs_user_input(&self, code: &StatusCode) -> bool {
        code.needs_user_input()
    }
}

impl<S: Clone> Clone for TaskEngine<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            agent_id: self.agent_id.clone(),
        }
    }
}

impl<S> std::fmt::Debug for TaskEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEngine")
            .field("agent_id", &self.agent_id)
            .finish()
    }
}
