//! High-level client API for agent gateways

pub mod agent;
pub mod agents;
pub mod builder;
pub mod cache;
pub mod config;
pub mod engine;
pub mod run;
pub mod tool;

pub use agent::AgentClient;
pub use builder::{A2AClientBuilder, A2AService};
pub use cache::ManifestCache;
pub use config::ClientConfig;
pub use engine::TaskEngine;
pub use run::RunRequest;
pub use tool::AgentTool;
