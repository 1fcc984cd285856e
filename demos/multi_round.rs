//! Drive one task to completion, answering the agent's questions from stdin
//!
//! ```text
//! A2A_API_KEY=sk-... cargo run --example multi_round -- tariff_calc "Import 100kg ice cream"
//! ```

use std::time::Duration;

use a2a_task_client::prelude::*;
use anyhow::{bail, Context};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let agent_id = args.next().with_context(|| {
        format!("usage: multi_round <agent_id> <text> (agents: {})", agents::ALL.join(", "))
    })?;
    let text = args.collect::<Vec<_>>().join(" ");

    let client = A2AClientBuilder::from_config(ClientConfig::from_env()?)?.build()?;
    let engine = client.agent(agent_id);

    let manifest = engine.manifest().await?;
    println!("Agent: {} ({})", manifest.name, manifest.description);

    let mut envelope = engine.run(text.as_str()).await?;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    // The agent may ask several follow-up questions before it accepts the task
    while envelope.needs_user_input() {
        let task_id = envelope
            .task_id()
            .context("agent asked for input without a task id")?
            .to_string();

        println!("{}", envelope.user_prompt().unwrap_or_default());
        let Some(answer) = stdin.next_line().await? else {
            bail!("stdin closed before the task was accepted");
        };

        envelope = engine
            .run(RunRequest::new(answer).with_task_id(task_id))
            .await?;
    }

    let task_id = envelope
        .task_id()
        .context("agent response carried no task id")?
        .to_string();

    while !envelope.code.is_terminal() {
        println!("{} ({:?})", envelope.code, envelope.stage());
        tokio::time::sleep(POLL_INTERVAL).await;
        envelope = engine.status(&task_id).await?;
    }

    if !envelope.is_finished() {
        bail!("task {} ended with {}: {}", task_id, envelope.code, envelope.message);
    }

    let results = engine.results(&task_id).await?;
    match results.content() {
        Some(Content::Text(text)) => println!("{}", text),
        Some(content) => {
            let data = content.result_data().cloned().unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        None => println!("Task completed without content"),
    }

    Ok(())
}
