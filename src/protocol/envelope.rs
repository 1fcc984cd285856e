//! The normalized response shape returned by every non-streaming operation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    error::A2AError,
    status::{RunStatus, Stage, StatusCode},
};

const DEFAULT_USER_PROMPT: &str = "Additional user input is required.";

/// Normalized response of `run`, `status` and `results`
///
/// `code` always equals `data.code` when `data` is present. Deserializing
/// goes through the same normalization as gateway responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEnvelope")]
pub struct Envelope {
    /// Business-level success flag reported by the agent
    pub success: bool,

    /// Lifecycle code
    pub code: StatusCode,

    /// Human-readable message
    #[serde(default)]
    pub message: String,

    /// Task payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TaskData>,

    /// Response metadata (credits used, agent, timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    /// Structured error details, if the agent reported any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

/// Task state carried inside an [`Envelope`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskData {
    /// Server-issued task identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Processing stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,

    /// Lifecycle code, mirrored from the envelope
    pub code: StatusCode,

    /// Plain text or structured result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Whether this is the final state of the task
    #[serde(default)]
    pub is_final: bool,

    /// Any other fields the agent sent (progress, intermediate steps, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskData {
    pub fn new(code: StatusCode) -> Self {
        Self {
            task_id: None,
            stage: None,
            code,
            content: None,
            is_final: false,
            extra: Map::new(),
        }
    }
}

/// Task output: plain text or a structured object, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Structured(Value),
}

impl Content {
    /// Text content, if this is plain text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Structured(_) => None,
        }
    }

    /// Result payload of structured content
    ///
    /// Unwraps `{"type": "result", "data": {...}}`; other objects are
    /// returned as-is.
    pub fn result_data(&self) -> Option<&Value> {
        match self {
            Content::Text(_) => None,
            Content::Structured(value) => {
                if value.get("type").and_then(Value::as_str) == Some("result") {
                    value.get("data")
                } else {
                    Some(value)
                }
            }
        }
    }
}

impl Envelope {
    /// Create a successful envelope with the given code and no data
    pub fn new(code: StatusCode) -> Self {
        Self {
            success: true,
            code,
            message: String::new(),
            data: None,
            metadata: None,
            errors: None,
        }
    }

    /// Attach task data, keeping its code in step with the envelope
    pub fn with_data(mut self, mut data: TaskData) -> Self {
        data.code = self.code.clone();
        self.data = Some(data);
        self
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Task identifier issued by the agent
    pub fn task_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.task_id.as_deref())
    }

    /// Processing stage
    pub fn stage(&self) -> Option<&Stage> {
        self.data.as_ref().and_then(|d| d.stage.as_ref())
    }

    /// Task output, if any
    pub fn content(&self) -> Option<&Content> {
        self.data.as_ref().and_then(|d| d.content.as_ref())
    }

    /// Whether the agent needs more caller input
    pub fn needs_user_input(&self) -> bool {
        self.code.needs_user_input()
    }

    /// Whether the task completed successfully
    pub fn is_finished(&self) -> bool {
        self.code == StatusCode::TaskCompleted
    }

    /// Whether the task failed
    pub fn is_failed(&self) -> bool {
        self.code == StatusCode::TaskFailed
    }

    /// Coarse run state
    pub fn run_status(&self) -> RunStatus {
        self.code.run_status()
    }

    /// The question to put to the user while the agent is waiting for input
    pub fn user_prompt(&self) -> Option<String> {
        if !self.needs_user_input() {
            return None;
        }

        let from_content = match self.content() {
            Some(Content::Text(text)) => Some(text.clone()),
            Some(Content::Structured(value)) => value
                .get("prompt")
                .and_then(Value::as_str)
                .map(str::to_string),
            None => None,
        };

        Some(from_content.unwrap_or_else(|| {
            if self.message.is_empty() {
                DEFAULT_USER_PROMPT.to_string()
            } else {
                self.message.clone()
            }
        }))
    }
}

/// Envelope as received on the wire, before normalization
#[derive(Debug, Deserialize)]
pub struct RawEnvelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    code: Option<StatusCode>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<RawTaskData>,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawTaskData {
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    stage: Option<Stage>,
    #[serde(default)]
    code: Option<StatusCode>,
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    is_final: bool,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn default_success() -> bool {
    true
}

impl RawEnvelope {
    /// Build the canonical envelope
    ///
    /// The top-level code wins over `data.code`; either one alone is enough.
    pub fn normalize(self) -> Result<Envelope, A2AError> {
        let data_code = self.data.as_ref().and_then(|d| d.code.clone());

        let code = match (self.code, data_code) {
            (Some(top), Some(inner)) => {
                if top != inner {
                    tracing::warn!(
                        envelope_code = %top,
                        data_code = %inner,
                        "Envelope code disagrees with data.code, using envelope code"
                    );
                }
                top
            }
            (Some(top), None) => top,
            (None, Some(inner)) => inner,
            (None, None) => {
                return Err(A2AError::decode("Response envelope has no 'code' field"));
            }
        };

        let data = self.data.map(|raw| TaskData {
            task_id: raw.task_id,
            stage: raw.stage,
            code: code.clone(),
            content: raw.content,
            is_final: raw.is_final,
            extra: raw.extra,
        });

        Ok(Envelope {
            success: self.success,
            code,
            message: self.message.unwrap_or_default(),
            data,
            metadata: self.metadata,
            errors: self.errors,
        })
    }
}

impl TryFrom<RawEnvelope> for Envelope {
    type Error = A2AError;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        raw.normalize()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(value: Value) -> Envelope {
        serde_json::from_value::<RawEnvelope>(value)
            .unwrap()
            .normalize()
            .unwrap()
    }

    #[test]
    fn test_normalize_fills_data_code() {
        let envelope = decode(json!({
            "success": true,
            "code": "WAITING_USER",
            "message": "Which country of origin?",
            "data": {"task_id": "tsk_1", "stage": "interpreting"}
        }));

        assert_eq!(envelope.code, StatusCode::WaitingUser);
        assert_eq!(envelope.data.as_ref().unwrap().code, StatusCode::WaitingUser);
        assert_eq!(envelope.task_id(), Some("tsk_1"));
        assert_eq!(envelope.stage(), Some(&Stage::Interpreting));
        assert!(envelope.needs_user_input());
    }

    #[test]
    fn test_normalize_top_level_code_wins() {
        let envelope = decode(json!({
            "code": "TASK_RUNNING",
            "data": {"task_id": "tsk_1", "code": "TASK_ACCEPTED"}
        }));

        assert!(envelope.success);
        assert_eq!(envelope.code, StatusCode::TaskRunning);
        assert_eq!(envelope.data.unwrap().code, StatusCode::TaskRunning);
    }

    #[test]
    fn test_normalize_code_from_data_only() {
        let envelope = decode(json!({"data": {"task_id": "t", "code": "TASK_COMPLETED"}}));
        assert_eq!(envelope.code, StatusCode::TaskCompleted);
    }

    #[test]
    fn test_missing_code_is_decode_error() {
        let raw: RawEnvelope = serde_json::from_value(json!({"success": true})).unwrap();
        let err = raw.normalize().unwrap_err();
        assert_eq!(err.api_code, "DECODE_ERROR");
    }

    #[test]
    fn test_content_shapes() {
        let envelope = decode(json!({
            "code": "TASK_COMPLETED",
            "data": {
                "task_id": "tsk_1",
                "content": {"type": "result", "data": {"duty": 12.5}},
                "is_final": true,
                "progress": 100
            }
        }));

        let content = envelope.content().unwrap();
        assert!(content.as_text().is_none());
        assert_eq!(content.result_data().unwrap()["duty"], 12.5);
        assert_eq!(envelope.data.as_ref().unwrap().extra["progress"], 100);
        assert!(envelope.is_finished());

        let envelope = decode(json!({
            "code": "WAITING_USER",
            "data": {"content": "Please confirm the HS code."}
        }));
        assert_eq!(
            envelope.content().unwrap().as_text(),
            Some("Please confirm the HS code.")
        );
    }

    #[test]
    fn test_user_prompt() {
        let envelope = decode(json!({
            "code": "WAITING_USER",
            "message": "Need more info",
            "data": {"content": {"prompt": "Which country?"}}
        }));
        assert_eq!(envelope.user_prompt().as_deref(), Some("Which country?"));

        let envelope = decode(json!({"code": "WAITING_USER", "message": "Need more info"}));
        assert_eq!(envelope.user_prompt().as_deref(), Some("Need more info"));

        let envelope = decode(json!({"code": "WAITING_USER"}));
        assert_eq!(envelope.user_prompt().as_deref(), Some(DEFAULT_USER_PROMPT));

        let envelope = decode(json!({"code": "TASK_RUNNING"}));
        assert!(envelope.user_prompt().is_none());
    }

    #[test]
    fn test_builder_keeps_codes_in_step() {
        let mut data = TaskData::new(StatusCode::TaskAccepted);
        data.task_id = Some("tsk_9".into());

        let envelope = Envelope::new(StatusCode::TaskRunning).with_data(data);
        assert_eq!(envelope.data.as_ref().unwrap().code, StatusCode::TaskRunning);

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["code"], "TASK_RUNNING");
        assert_eq!(json["data"]["code"], "TASK_RUNNING");
        assert_eq!(json["data"]["task_id"], "tsk_9");
    }

    #[test]
    fn test_direct_deserialize_is_normalized() {
        let envelope: Envelope = serde_json::from_value(json!({
            "code": "TASK_RUNNING",
            "data": {"task_id": "tsk_1", "code": "TASK_ACCEPTED"}
        }))
        .unwrap();
        assert_eq!(envelope.data.unwrap().code, StatusCode::TaskRunning);

        let envelope: Envelope =
            serde_json::from_value(json!({"data": {"code": "WAITING_USER"}})).unwrap();
        assert_eq!(envelope.code, StatusCode::WaitingUser);
        assert_eq!(envelope.message, "");

        let err = serde_json::from_value::<Envelope>(json!({"success": true})).unwrap_err();
        assert!(err.to_string().contains("no 'code' field"));
    }
}
