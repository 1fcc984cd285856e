//! Scripted in-process gateway used by the integration tests

#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    task::{Context, Poll},
    time::Duration,
};

use a2a_task_client::prelude::*;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use url::Url;

type Handler = dyn Fn(&str, &Value) -> (u16, Value) + Send + Sync;

/// Transport answering from a closure keyed on endpoint and JSON body
#[derive(Clone)]
pub struct Gateway {
    base_url: Url,
    handler: Arc<Handler>,
    stream_body: Option<(u16, Arc<dyn Fn() -> ByteChunks + Send + Sync>)>,
    latency: Duration,
    calls: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

pub type ByteChunks = futures::stream::BoxStream<'static, Result<Bytes, A2AError>>;

impl Gateway {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> (u16, Value) + Send + Sync + 'static,
    {
        Self {
            base_url: Url::parse("https://gateway.test/api/v1/agents").unwrap(),
            handler: Arc::new(handler),
            stream_body: None,
            latency: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            bodies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve streaming requests from a fresh byte stream per call
    pub fn with_stream<F>(mut self, status: u16, body: F) -> Self
    where
        F: Fn() -> ByteChunks + Send + Sync + 'static,
    {
        self.stream_body = Some((status, Arc::new(body)));
        self
    }

    /// Delay every non-streaming response
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }

    pub fn client(&self) -> AgentClient<A2AService> {
        self.client_with_timeout(Duration::from_secs(60))
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> AgentClient<A2AService> {
        A2AClientBuilder::new(self.base_url.clone())
            .with_transport(self.clone())
            .with_bearer_auth("sk-test")
            .with_timeout(timeout)
            .build()
            .unwrap()
    }

    fn record(&self, request: &TransportRequest) -> Value {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = if request.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&request.body).unwrap()
        };
        self.bodies.lock().unwrap().push(body.clone());
        body
    }
}

#[async_trait]
impl Transport for Gateway {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        let body = self.record(&request);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let (status, reply) = (self.handler)(&request.endpoint, &body);
        let bytes = match reply {
            Value::Null => Vec::new(),
            reply => serde_json::to_vec(&reply).unwrap(),
        };
        Ok(TransportResponse::new(status).body(bytes))
    }

    async fn execute_streaming(
        &self,
        request: TransportRequest,
    ) -> Result<TransportStream, A2AError> {
        self.record(&request);
        match &self.stream_body {
            Some((status, body)) => Ok(TransportStream::new(*status, body())),
            None => Err(A2AError::network("no stream scripted")),
        }
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn supports_streaming(&self) -> bool {
        self.stream_body.is_some()
    }
}

/// SSE chunks as a byte stream that ends when the chunks run out
pub fn sse(chunks: &[&str]) -> ByteChunks {
    let chunks: Vec<_> = chunks
        .iter()
        .map(|c| Ok(Bytes::from(c.to_string())))
        .collect();
    stream::iter(chunks).boxed()
}
