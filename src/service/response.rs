//! A2A service response types

use std::fmt;

use crate::{
    codec::FrameStream,
    protocol::{envelope::Envelope, manifest::Manifest},
};

/// Response from an A2A service operation
pub enum A2AResponse {
    /// Envelope response (from run, status, results)
    Envelope(Box<Envelope>),

    /// Manifest response
    Manifest(Box<Manifest>),

    /// Frame stream (from streaming run)
    Stream(FrameStream),
}

impl A2AResponse {
    /// Extract an envelope from the response, if present
    pub fn into_envelope(self) -> Option<Envelope> {
        match self {
            A2AResponse::Envelope(envelope) => Some(*envelope),
            _ => None,
        }
    }

    /// Extract a manifest from the response, if present
    pub fn into_manifest(self) -> Option<Manifest> {
        match self {
            A2AResponse::Manifest(manifest) => Some(*manifest),
            _ => None,
        }
    }

    /// Extract a frame stream from the response, if present
    pub fn into_stream(self) -> Option<FrameStream> {
        match self {
            A2AResponse::Stream(stream) => Some(stream),
            _ => None,
        }
    }
}

impl fmt::Debug for A2AResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A2AResponse::Envelope(envelope) => f.debug_tuple("Envelope").field(envelope).finish(),
            A2AResponse::Manifest(manifest) => f.debug_tuple("Manifest").field(manifest).finish(),
            A2AResponse::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
