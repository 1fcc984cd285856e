//! Decoded units of a server-sent reasoning/progress stream

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::status::{Stage, StatusCode};

/// One decoded SSE event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamFrame {
    /// SSE event name ("stream" unless the server says otherwise)
    pub event: String,

    /// Frame payload
    pub data: FrameData,
}

impl StreamFrame {
    /// Whether this is the last frame of the stream
    pub fn is_final(&self) -> bool {
        self.data.is_final
    }

    /// Task identifier carried by the frame
    pub fn task_id(&self) -> Option<&str> {
        self.data.task_id.as_deref()
    }
}

/// Payload of a [`StreamFrame`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,

    /// Usually `THINKING`
    pub code: StatusCode,

    /// Reasoning lines emitted since the previous frame
    #[serde(default, deserialize_with = "lines")]
    pub reasoning: Vec<String>,

    /// Server timestamp as sent (RFC 3339 or unix seconds)
    #[serde(default, deserialize_with = "timestamp")]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub is_final: bool,

    /// Fields not covered above (agent name, progress, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FrameData {
    /// Parse the timestamp, accepting RFC 3339 strings and unix seconds
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }

        raw.parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

fn lines<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
