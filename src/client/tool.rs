//! Agents described as callable tools

use std::sync::Arc;

use serde_json::Value;
use tower_service::Service;

use crate::{
    client::{engine::TaskEngine, run::RunRequest},
    protocol::{envelope::Envelope, error::A2AError, manifest::Manifest},
    service::{A2ARequest, A2AResponse},
};

/// An agent packaged for a host framework's tool registry
///
/// Name and description come from the manifest; `engine` is the callable.
pub struct AgentTool<S> {
    pub name: String,
    pub description: String,
    pub agent_id: String,
    pub manifest: Arc<Manifest>,
    pub engine: TaskEngine<S>,
}

impl<S> AgentTool<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    pub(crate) fn new(manifest: Arc<Manifest>, engine: TaskEngine<S>) -> Self {
        Self {
            name: manifest.name.clone(),
            description: manifest.description.clone(),
            agent_id: engine.agent_id().to_string(),
            manifest,
            engine,
        }
    }

    /// JSON schema of the tool input
    pub fn input_schema(&self) -> &Value {
        &self.manifest.input_schema
    }

    /// Run the agent once with the given input
    pub async fn invoke(&self, request: impl Into<RunRequest>) -> Result<Envelope, A2AError> {
        self.engine.run(request).await
    }
}

impl<S: Clone> Clone for AgentTool<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            agent_id: self.agent_id.clone(),
            manifest: self.manifest.clone(),
            engine: self.engine.clone(),
        }
    }
}

impl<S> std::fmt::Debug for AgentTool<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentTool")
            .field("name", &self.name)
            .field("agent_id", &self.agent_id)
            .finish()
    }
}
