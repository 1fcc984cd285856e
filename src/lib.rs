//! # A2A Task Client
//!
//! A Tower-based client for driving tasks on remote agents behind an A2A
//! gateway.
//!
//! A task is a server-owned conversation identified by a `task_id`. The
//! client turns stateless HTTP calls into a resumable, optionally streamed
//! conversation and normalizes every success, error and stream shape into
//! one stable contract: [`Envelope`](protocol::Envelope),
//! [`StreamFrame`](protocol::StreamFrame) and [`A2AError`](protocol::A2AError).
//!
//! ## Features
//!
//! - **Resumable tasks**: `run` starts or continues a task, `status` and
//!   `results` query it; the caller owns the polling loop
//! - **Streaming**: reasoning frames decoded from Server-Sent Events, pulled
//!   one at a time, ending at the final frame
//! - **One error shape**: HTTP failures, transport faults, malformed bodies
//!   and business-level failures all become an `A2AError`
//! - **Composable Middleware**: authentication and request validation as
//!   Tower layers over a pluggable transport
//! - **Single-flight manifests**: agent manifests are fetched once and cached
//!
//! ## Example
//!
//! ```rust,no_run
//! use a2a_task_client::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = A2AClientBuilder::from_config(ClientConfig::from_env()?)?
//!         .with_timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     let tariffs = client.tariff_calculation();
//!     let mut envelope = tariffs.run("Import 100kg ice cream").await?;
//!
//!     while envelope.needs_user_input() {
//!         let task_id = envelope.task_id().unwrap_or_default().to_string();
//!         envelope = tariffs.run(RunRequest::new("China").with_task_id(task_id)).await?;
//!     }
//!
//!     println!("{}: {:?}", envelope.code, envelope.task_id());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod layer;
pub mod protocol;
pub mod service;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{
            agents, A2AClientBuilder, A2AService, AgentClient, AgentTool, ClientConfig,
            RunRequest, TaskEngine,
        },
        codec::FrameStream,
        protocol::{
            needs_user_input, A2AError, A2AResult, Content, Envelope, ErrorKind, Manifest,
            RunStatus, Stage, StatusCode, StreamFrame,
        },
        transport::{Transport, TransportRequest, TransportResponse, TransportStream},
    };
}
