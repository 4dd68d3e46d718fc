//! Run one queue message through the pipeline without Lambda.
//!
//! Uses the same environment configuration as the worker, so `STORAGE_BACKEND=local` with
//! `LOCAL_STORAGE_PATH` and `LOCAL_SIGNING_SECRET` writes results to a directory.

use anyhow::Context;
use clap::Parser;
use imgpipe_core::Config;
use imgpipe_worker::{init_telemetry, Dispatcher, QueuedMessage};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "imgpipe-local",
    about = "Process a single image resize message",
    version
)]
struct Cli {
    /// Message body as JSON; read from --file or stdin when omitted
    message: Option<String>,
    /// Read the message body from a file
    #[arg(long, short, conflicts_with = "message")]
    file: Option<PathBuf>,
    /// Print the resulting link as JSON
    #[arg(long)]
    json: bool,
}

fn read_body(cli: &Cli) -> anyhow::Result<String> {
    if let Some(message) = &cli.message {
        return Ok(message.clone());
    }

    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message file {}", path.display()));
    }

    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .context("Failed to read message from stdin")?;
    Ok(body)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;
    init_telemetry(config.log_format).context("Failed to initialize logging")?;

    let body = read_body(&cli)?;
    let dispatcher = Dispatcher::from_config(&config).await?;

    let message = QueuedMessage {
        message_id: Some("local".to_string()),
        body: Some(body),
    };
    let mut links = dispatcher.handle_batch(std::slice::from_ref(&message)).await?;
    let link = links.pop().context("Dispatcher returned no link")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&link)?);
    } else {
        println!("{}", link.url);
    }

    Ok(())
}
