//! Stream an agent's reasoning, then fetch the result
//!
//! ```text
//! A2A_API_KEY=sk-... cargo run --example stream_reasoning -- tariff_calc "Import 100kg ice cream from China"
//! ```

use a2a_task_client::prelude::*;
use anyhow::Context;
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let agent_id = args.next().with_context(|| {
        format!("usage: stream_reasoning <agent_id> <text> (agents: {})", agents::ALL.join(", "))
    })?;
    let text = args.collect::<Vec<_>>().join(" ");

    let client = A2AClientBuilder::from_config(ClientConfig::from_env()?)?.build()?;

    let manifest = client.manifest(&agent_id).await?;
    if !manifest.capabilities.streaming {
        tracing::warn!(%agent_id, "Agent does not advertise streaming");
    }

    let mut frames = client.run_stream(&agent_id, text).await?;
    let mut task_id = None;

    while let Some(frame) = frames.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) if e.kind == ErrorKind::DecodeError => {
                tracing::warn!(error = %e, "Skipping unreadable frame");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(id) = frame.task_id() {
            task_id = Some(id.to_string());
        }
        for line in &frame.data.reasoning {
            println!("[{}] {}", frame.data.code, line);
        }
    }

    let task_id = task_id.context("stream ended without a task id")?;
    let results = client.results(&agent_id, &task_id).await?;

    println!("{} -> {}", task_id, results.code);
    if let Some(content) = results.content() {
        println!("{}", serde_json::to_string_pretty(content)?);
    }

    Ok(())
}
