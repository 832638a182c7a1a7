//! Storyquest terminal client entry point.

use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use storyquest_cli::app::App;
use storyquest_cli::args::Args;
use storyquest_cli::terminal::TerminalSink;
use storyquest_client::{ClientConfig, HttpChapterService};
use storyquest_core::clock::SystemClock;
use storyquest_session::application::controller::GameController;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the story.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr);
    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    // Environment first, flags on top.
    let config = args.apply_to(ClientConfig::from_env()?)?;
    tracing::info!(base_url = %config.base_url, timeout = ?config.timeout, "starting storyquest");

    let service = Arc::new(HttpChapterService::new(config)?);
    let controller = GameController::new(service.clone(), Arc::new(SystemClock));
    let mut app = App::new(controller, service, TerminalSink::new(std::io::stdout()));

    app.run(BufReader::new(tokio::io::stdin()), args.launch_options())
        .await?;

    Ok(())
}
