//! Task operations against an agent gateway

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Operations the engine can perform against one agent
///
/// Each operation is binding-independent; the codec and transport decide how
/// it travels.
#[derive(Debug, Clone, PartialEq)]
pub enum A2AOperation {
    /// Start a new task or continue an existing one
    Run {
        /// Caller input
        text: String,

        /// Task to continue; `None` starts a new task
        task_id: Option<String>,

        /// Whether the response should be an event stream
        stream: bool,

        /// Extra fields merged into the request body
        extra: Map<String, Value>,
    },

    /// Query the current state of a task
    Status {
        /// The task to query
        task_id: String,
    },

    /// Fetch the output of a task
    Results {
        /// The task to query
        task_id: String,
    },

    /// Fetch the agent manifest
    Manifest,
}

impl A2AOperation {
    /// The `mode` field sent in the request body
    pub fn mode(&self) -> &'static str {
        match self {
            A2AOperation::Run { .. } => "run",
            A2AOperation::Status { .. } => "status",
            A2AOperation::Results { .. } => "results",
            A2AOperation::Manifest => "manifest",
        }
    }

    /// Endpoint path for this operation, relative to the gateway base URL
    ///
    /// The agent id is percent-encoded into a single path segment.
    pub fn endpoint(&self, agent_id: &str) -> String {
        let agent = path_segment(agent_id);
        match self {
            A2AOperation::Manifest => format!("{}/manifest", agent),
            _ => format!("{}/run", agent),
        }
    }

    /// HTTP method for this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::Manifest => "GET",
            _ => "POST",
        }
    }

    /// Whether this operation expects a streaming response
    pub fn is_streaming(&self) -> bool {
        matches!(self, A2AOperation::Run { stream: true, .. })
    }

    /// The task this operation refers to, if any
    pub fn task_id(&self) -> Option<&str> {
        match self {
            A2AOperation::Run { task_id, .. } => task_id.as_deref(),
            A2AOperation::Status { task_id } | A2AOperation::Results { task_id } => Some(task_id),
            A2AOperation::Manifest => None,
        }
    }
}

/// Percent-encode everything but unreserved characters
fn path_segment(value: &str) -> String {
    // Form encoding writes spaces as '+' and escapes a literal '+'
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
