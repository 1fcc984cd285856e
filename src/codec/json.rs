//! JSON codec for the gateway's HTTP+JSON binding

use bytes::Bytes;
use serde_json::{json, Value};

use crate::{
    codec::Codec,
    protocol::{
        envelope::RawEnvelope, error::A2AError, manifest::Manifest, operation::A2AOperation,
    },
    service::response::A2AResponse,
};

/// JSON codec for the HTTP+JSON binding
#[derive(Debug, Clone, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError> {
        let json = match operation {
            A2AOperation::Run {
                text,
                task_id,
                stream,
                extra,
            } => {
                // Extra fields never shadow the protocol fields
                let mut obj = extra.clone();
                obj.insert("mode".into(), json!(operation.mode()));
                obj.insert("text".into(), json!(text));
                obj.insert("stream".into(), json!(stream));
                match task_id {
                    Some(id) => {
                        obj.insert("task_id".into(), json!(id));
                    }
                    None => {
                        obj.remove("task_id");
                    }
                }

                Value::Object(obj)
            }
            A2AOperation::Status { task_id } | A2AOperation::Results { task_id } => {
                json!({
                    "mode": operation.mode(),
                    "task_id": task_id,
                })
            }
            // GET requests carry no body
            A2AOperation::Manifest => return Ok(Bytes::new()),
        };

        let bytes = serde_json::to_vec(&json)?;
        Ok(Bytes::from(bytes))
    }

    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(A2AError::decode(format!(
                "Empty response body for '{}'",
                operation.mode()
            )));
        }

        match operation {
            A2AOperation::Run { .. } | A2AOperation::Status { .. } | A2AOperation::Results { .. } => {
                let raw: RawEnvelope = serde_json::from_slice(body)?;
                Ok(A2AResponse::Envelope(Box::new(raw.normalize()?)))
            }
            A2AOperation::Manifest => {
                let manifest: Manifest = serde_json::from_slice(body)?;
                Ok(A2AResponse::Manifest(Box::new(manifest)))
            }
        }
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
