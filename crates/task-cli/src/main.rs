//! audio-task: submit one audio file, wait for the job, print the download URL.

use clap::Parser;
use task_cli::cli::Cli;
use task_runner::PollPolicy;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match task_cli::run(&cli, PollPolicy::from_env()).await {
        Ok(result) => {
            println!("{}", serde_json::to_string(&result)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}
