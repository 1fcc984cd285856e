use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use url::Url;

use crate::{
    protocol::error::A2AError,
    transport::{Transport, TransportRequest, TransportResponse, TransportStream},
};

/// Mock transport for internal testing
///
/// Answers requests from a closure, records every request it sees and can
/// replay a scripted SSE body chunk by chunk.
#[derive(Clone)]
pub(crate) struct MockTransport {
    handler: Arc<dyn Fn(TransportRequest) -> TransportResponse + Send + Sync>,
    stream: Option<(u16, Arc<Vec<Bytes>>)>,
    hold_open: bool,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
    calls: Arc<AtomicUsize>,
    base_url: Url,
}

impl MockTransport {
    /// Create a new mock transport with a custom request handler
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(TransportRequest) -> TransportResponse + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            stream: None,
            hold_open: false,
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            base_url: Url::parse("mock://gateway").unwrap(),
        }
    }

    /// Create a mock transport that always returns the given JSON body with 200 OK
    pub fn json(body: serde_json::Value) -> Self {
        let bytes = Bytes::from(serde_json::to_vec(&body).unwrap());
        Self::new(move |_| TransportResponse::new(200).body(bytes.clone()))
    }

    /// Serve streaming requests from the given body chunks
    pub fn with_stream(mut self, status: u16, chunks: &[&str]) -> Self {
        let chunks = chunks
            .iter()
            .map(|c| Bytes::from(c.to_string()))
            .collect::<Vec<_>>();
        self.stream = Some((status, Arc::new(chunks)));
        self
    }

    /// Keep scripted streams open after their last chunk, like a server
    /// that never closes the connection
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Number of requests that reached the transport
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request that reached the transport, in order
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// JSON body of the most recent request
    pub fn last_body(&self) -> serde_json::Value {
        let requests = self.requests.lock().unwrap();
        let last = requests.last().expect("no request recorded");
        serde_json::from_slice(&last.body).unwrap()
    }

    fn record(&self, request: &TransportRequest) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        self.record(&request);
        Ok((self.handler)(request))
    }

    async fn execute_streaming(
        &self,
        request: TransportRequest,
    ) -> Result<TransportStream, A2AError> {
        self.record(&request);
        let (status, chunks) = self
            .stream
            .clone()
            .ok_or_else(|| A2AError::network("no stream scripted"))?;

        let chunks = stream::iter((*chunks).clone().into_iter().map(Ok));
        let body = if self.hold_open {
            chunks.chain(stream::pending()).boxed()
        } else {
            chunks.boxed()
        };
        Ok(TransportStream::new(status, body))
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn supports_streaming(&self) -> bool {
        self.stream.is_some()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("calls", &self.calls())
            .finish()
    }
}
