//! Server-Sent Events (SSE) codec for streaming `run` responses
//!
//! Turns a raw byte stream into a lazy, single-pass sequence of
//! [`StreamFrame`]s. The sequence ends when the transport closes, when a
//! `[DONE]` sentinel arrives, or right after a frame with `is_final = true`.

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;
use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures::{
    ready,
    stream::{FusedStream, Stream, StreamExt},
};
use serde_json::Value;

use crate::protocol::{
    error::A2AError,
    frame::{FrameData, StreamFrame},
};

/// Lazy sequence of decoded frames
///
/// Dropping it closes the underlying connection.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<StreamFrame, A2AError>> + Send>>;

const DONE_SENTINEL: &str = "[DONE]";
const DEFAULT_EVENT: &str = "stream";
/// Name the SSE parser gives events without an `event:` line
const UNNAMED_EVENT: &str = "message";

/// Outcome of decoding one SSE event
enum Step {
    Frame(Result<StreamFrame, A2AError>),
    Skip,
    Done,
}

/// SSE codec for parsing streaming responses
#[derive(Debug, Clone, Default)]
pub struct SseCodec;

impl SseCodec {
    /// Create a new SSE codec
    pub fn new() -> Self {
        Self
    }

    /// Parse an SSE byte stream into a stream of frames
    ///
    /// Events split across chunk boundaries are reassembled; comment
    /// (keep-alive) lines and empty events are skipped. A malformed payload
    /// yields an `Err` item without ending the stream.
    pub fn parse_stream<S>(&self, byte_stream: S) -> FrameStream
    where
        S: Stream<Item = Result<Bytes, A2AError>> + Send + 'static,
    {
        let steps = byte_stream
            .eventsource()
            .map(|result| match result {
                Ok(event) => decode_event(event),
                Err(EventStreamError::Transport(err)) => Step::Frame(Err(err)),
                Err(EventStreamError::Utf8(err)) => Step::Frame(Err(A2AError::decode(format!(
                    "SSE stream is not valid UTF-8: {}",
                    err
                )))),
                Err(EventStreamError::Parser(err)) => Step::Frame(Err(A2AError::decode(
                    format!("Failed to parse SSE stream: {}", err),
                ))),
            })
            .boxed();

        Box::pin(Frames {
            inner: Some(steps),
            finished: false,
        })
    }
}

fn decode_event(event: Event) -> Step {
    let payload = event.data.trim();
    if payload.is_empty() {
        return Step::Skip;
    }
    if payload == DONE_SENTINEL {
        return Step::Done;
    }

    let name = if event.event.is_empty() || event.event == UNNAMED_EVENT {
        DEFAULT_EVENT.to_string()
    } else {
        event.event
    };

    Step::Frame(decode_frame(name, payload))
}

/// Decode one frame payload
///
/// Accepts the bare frame object or a full envelope whose `data` holds it.
fn decode_frame(event: String, payload: &str) -> Result<StreamFrame, A2AError> {
    let value: Value = serde_json::from_str(payload).map_err(|e| {
        tracing::warn!(%event, error = %e, "Malformed SSE frame payload");
        A2AError::decode(format!("Failed to parse SSE event data: {}", e))
            .with_details(Value::String(payload.to_string()))
    })?;

    let frame_value = match value {
        Value::Object(mut outer) => match outer.remove("data") {
            Some(Value::Object(mut inner)) => {
                for key in ["code", "task_id", "stage", "is_final"] {
                    if !inner.contains_key(key) {
                        if let Some(v) = outer.remove(key) {
                            inner.insert(key.to_string(), v);
                        }
                    }
                }
                Value::Object(inner)
            }
            Some(other) => {
                outer.insert("data".to_string(), other);
                Value::Object(outer)
            }
            None => Value::Object(outer),
        },
        other => other,
    };

    let data: FrameData = serde_json::from_value(frame_value).map_err(|e| {
        A2AError::decode(format!("SSE event data is not a stream frame: {}", e))
            .with_details(Value::String(payload.to_string()))
    })?;

    Ok(StreamFrame { event, data })
}

/// Frame sequence that stops after the final frame
///
/// The inner stream is dropped as soon as the sequence ends, so the
/// connection is released without waiting for the server to close it.
struct Frames {
    inner: Option<Pin<Box<dyn Stream<Item = Step> + Send>>>,
    finished: bool,
}

impl Frames {
    fn finish(&mut self) {
        if !self.finished {
            tracing::debug!("SSE frame stream closed");
        }
        self.finished = true;
        self.inner = None;
    }
}

impl Stream for Frames {
    type Item = Result<StreamFrame, A2AError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            let Some(inner) = self.inner.as_mut() else {
                return Poll::Ready(None);
            };

            match ready!(inner.poll_next_unpin(cx)) {
                None | Some(Step::Done) => {
                    self.finish();
                    return Poll::Ready(None);
                }
                Some(Step::Skip) => continue,
                Some(Step::Frame(Ok(frame))) => {
                    if frame.is_final() {
                        self.finish();
                    }
                    return Poll::Ready(Some(Ok(frame)));
                }
                Some(Step::Frame(Err(err))) => {
                    if err.is_network() {
                        self.finish();
                    }
                    return Poll::Ready(Some(Err(err)));
                }
            }
        }
    }
}

impl FusedStream for Frames {
    fn is_terminated(&self) -> bool {
        self.finished
    }
}
