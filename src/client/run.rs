//! Input for a `run` call

use serde_json::{Map, Value};

use crate::protocol::operation::A2AOperation;

/// Input for starting or continuing a task
///
/// ```rust
/// use a2a_task_client::prelude::*;
///
/// let first = RunRequest::new("Import 100kg ice cream");
/// let reply = RunRequest::new("China").with_task_id("tsk_1");
/// assert_eq!(reply.task_id.as_deref(), Some("tsk_1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunRequest {
    /// Caller input
    pub text: String,

    /// Task to continue; `None` starts a new task
    pub task_id: Option<String>,

    /// Extra fields merged into the request body
    pub extra: Map<String, Value>,
}

impl RunRequest {
    /// Start a new task with the given input
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Continue an existing task
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Continue the task if one is known
    pub fn with_optional_task_id(mut self, task_id: Option<impl Into<String>>) -> Self {
        self.task_id = task_id.map(Into::into);
        self
    }

    /// Add an extra body field
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub(crate) fn into_operation(self, stream: bool) -> A2AOperation {
        A2AOperation::Run {
            text: self.text,
            task_id: self.task_id,
            stream,
            extra: self.extra,
        }
    }
}

impl From<&str> for RunRequest {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for RunRequest {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
