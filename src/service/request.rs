//! A2A service request types

use std::{collections::HashMap, time::Duration};

use uuid::Uuid;

use crate::{
    layer::auth::AuthCredentials,
    protocol::{error::A2AError, operation::A2AOperation},
};

/// A request to the A2A service
///
/// This wraps an operation with the agent it targets and the context needed
/// for execution.
#[derive(Debug, Clone)]
pub struct A2ARequest {
    /// Agent identity the operation targets
    pub agent_id: String,

    /// The operation to execute
    pub operation: A2AOperation,

    /// Request context (auth, timeouts, metadata)
    pub context: RequestContext,
}

impl A2ARequest {
    /// Create a new A2A request
    pub fn new(agent_id: impl Into<String>, operation: A2AOperation, context: RequestContext) -> Self {
        Self {
            agent_id: agent_id.into(),
            operation,
            context,
        }
    }

    /// Check the preconditions every request must meet before it is sent
    ///
    /// A `run` needs text unless it continues a task; `status` and `results`
    /// need a task id. Blank values count as missing.
    pub fn validate(&self) -> Result<(), A2AError> {
        if is_blank(&self.agent_id) {
            return Err(A2AError::invalid_request("agent_id is required"));
        }

        match &self.operation {
            A2AOperation::Run { text, task_id, .. } => {
                // A continuation may carry empty text
                let continues = task_id.as_deref().is_some_and(|id| !is_blank(id));
                if is_blank(text) && !continues {
                    return Err(A2AError::invalid_request(
                        "text is required to start a new task",
                    ));
                }
            }
            A2AOperation::Status { task_id } | A2AOperation::Results { task_id } => {
                if is_blank(task_id) {
                    return Err(A2AError::invalid_request("task_id is required"));
                }
            }
            A2AOperation::Manifest => {}
        }

        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Request context containing metadata and configuration
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id sent as `X-Request-Id`
    pub request_id: String,

    /// Authentication credentials (if any)
    pub auth: Option<AuthCredentials>,

    /// Request timeout (non-streaming requests only)
    pub timeout: Option<Duration>,

    /// Additional metadata headers
    pub metadata: HashMap<String, String>,
}

impl RequestContext {
    /// Create a new request context with a fresh request id
    pub fn new() -> Self {
        Self {
            request_id: Uuid::now_v7().to_string(),
            auth: None,
            timeout: Some(Duration::from_secs(60)),
            metadata: HashMap::new(),
        }
    }

    /// Set authentication credentials
    pub fn with_auth(mut self, auth: AuthCredentials) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a metadata header
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
