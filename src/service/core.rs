//! Core A2A protocol service implementation

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use futures::StreamExt;
use tower_service::Service;

use crate::{
    codec::{Codec, SseCodec},
    protocol::error::A2AError,
    service::{normalize, A2ARequest, A2AResponse},
    transport::{Transport, TransportRequest, TransportResponse, TransportStream},
};

const EVENT_STREAM: &str = "text/event-stream";
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Most bytes read from the body of a failed stream
const ERROR_BODY_LIMIT: usize = 64 * 1024;
/// Deadline for reading a failed stream's body when the request has none
const ERROR_BODY_TIMEOUT: Duration = Duration::from_secs(30);

/// Core A2A protocol service that wraps a transport
///
/// This service implements the Tower `Service` trait and turns one
/// [`A2ARequest`] into exactly one transport round trip. Every failure comes
/// back normalized into an [`A2AError`].
pub struct A2AProtocolService<T> {
    transport: T,
    codec: Arc<dyn Codec>,
    sse: SseCodec,
}

impl<T> A2AProtocolService<T>
where
    T: Transport,
{
    /// Create a new A2A protocol service
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation
    /// * `codec` - The codec for serialization/deserialization
    pub fn new(transport: T, codec: Arc<dyn Codec>) -> Self {
        Self {
            transport,
            codec,
            sse: SseCodec::new(),
        }
    }

    /// Build a transport request from an A2A request
    fn build_transport_request(
        req: &A2ARequest,
        codec: &dyn Codec,
    ) -> Result<TransportRequest, A2AError> {
        let operation = &req.operation;
        let method = operation.method();

        let accept = if operation.is_streaming() {
            EVENT_STREAM
        } else {
            codec.content_type()
        };

        let mut transport_req = TransportRequest::new(operation.endpoint(&req.agent_id), method)
            .header("Content-Type", codec.content_type())
            .header("Accept", accept)
            .header(REQUEST_ID_HEADER, req.context.request_id.clone());

        if let Some(auth) = &req.context.auth {
            let (header, value) = auth.to_header();
            transport_req = transport_req.header(header, value);
        }

        for (key, value) in &req.context.metadata {
            transport_req = transport_req.header(key.clone(), value.clone());
        }

        // Streams stay open for as long as the agent keeps reasoning
        if !operation.is_streaming() {
            if let Some(timeout) = req.context.timeout {
                transport_req = transport_req.timeout(timeout);
            }
        }

        let body = codec.encode_request(operation)?;
        if !body.is_empty() && method != "GET" {
            transport_req = transport_req.body(body);
        }

        Ok(transport_req)
    }

    /// Parse a complete transport response into an A2A response
    fn parse_transport_response(
        transport_resp: TransportResponse,
        codec: &dyn Codec,
        req: &A2ARequest,
    ) -> Result<A2AResponse, A2AError> {
        if !transport_resp.is_success() {
            return Err(normalize::http_failure(
                transport_resp.status,
                &transport_resp.body,
            ));
        }

        match codec.decode_response(&transport_resp.body, &req.operation)? {
            A2AResponse::Envelope(envelope) => {
                let envelope = normalize::business_failure(*envelope, transport_resp.status)?;
                tracing::debug!(
                    agent_id = %req.agent_id,
                    code = %envelope.code,
                    task_id = envelope.task_id().unwrap_or_default(),
                    "Agent responded"
                );
                Ok(A2AResponse::Envelope(Box::new(envelope)))
            }
            other => Ok(other),
        }
    }

    /// Turn an open event stream into a frame sequence
    ///
    /// A non-2xx stream never yields frames. Its body is read up to
    /// [`ERROR_BODY_LIMIT`] bytes or until `deadline`, whichever comes first,
    /// and normalized like any other error response.
    async fn open_stream(
        stream: TransportStream,
        sse: &SseCodec,
        deadline: Duration,
    ) -> Result<A2AResponse, A2AError> {
        if stream.is_success() {
            return Ok(A2AResponse::Stream(sse.parse_stream(stream.body)));
        }

        let status = stream.status;
        let mut body = Vec::new();
        let mut chunks = stream.body;
        let drain = async {
            while let Some(Ok(bytes)) = chunks.next().await {
                body.extend_from_slice(&bytes);
                if body.len() >= ERROR_BODY_LIMIT {
                    body.truncate(ERROR_BODY_LIMIT);
                    break;
                }
            }
        };

        if tokio::time::timeout(deadline, drain).await.is_err() {
            tracing::warn!(status, read = body.len(), "Failed stream body did not end in time");
        }

        Err(normalize::http_failure(status, &body))
    }
}

impl<T> Service<A2ARequest> for A2AProtocolService<T>
where
    T: Transport + Clone,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let transport = self.transport.clone();
        let codec = self.codec.clone();
        let sse = self.sse.clone();

        Box::pin(async move {
            req.validate()?;
            let transport_req = Self::build_transport_request(&req, codec.as_ref())?;

            tracing::debug!(
                agent_id = %req.agent_id,
                mode = req.operation.mode(),
                request_id = %req.context.request_id,
                stream = req.operation.is_streaming(),
                "Calling agent"
            );

            if req.operation.is_streaming() {
                let stream = transport.execute_streaming(transport_req).await?;
                let deadline = req.context.timeout.unwrap_or(ERROR_BODY_TIMEOUT);
                return Self::open_stream(stream, &sse, deadline).await;
            }

            let transport_resp = transport.execute(transport_req).await?;
            Self::parse_transport_response(transport_resp, codec.as_ref(), &req)
        })
    }
}

impl<T> Clone for A2AProtocolService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            codec: self.codec.clone(),
            sse: self.sse.clone(),
        }
    }
}
