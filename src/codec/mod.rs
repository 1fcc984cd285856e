//! Serialization codecs for the gateway wire format

pub mod json;
pub mod sse;

pub use json::JsonCodec;
pub use sse::{FrameStream, SseCodec};

use crate::{
    protocol::{error::A2AError, operation::A2AOperation},
    service::response::A2AResponse,
};
use bytes::Bytes;

/// Codec trait for encoding operations and decoding complete responses
///
/// Streaming bodies are decoded by [`SseCodec`] instead.
pub trait Codec: Send + Sync {
    /// Serialize an operation to a request body
    ///
    /// Operations without a body (e.g. manifest fetches) encode to empty bytes.
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError>;

    /// Deserialize a successful response body
    ///
    /// # Arguments
    ///
    /// * `body` - The response body bytes
    /// * `operation` - The original operation (for context)
    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError>;

    /// Get the content type for this codec
    fn content_type(&self) -> &str;
}
