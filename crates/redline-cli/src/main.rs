mod cli;
mod commands;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use redline_client::{HttpBackend, HttpBackendOptions};
use redline_config::Config;
use redline_workflow::ReviewBackend;

use crate::commands::review::Decision;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Log lines would tear the TUI; only enable there when asked for
    if !cli.command.is_interactive() || std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }

    let command = match cli.command {
        cli::Commands::Config(cmd) => return commands::config::handle(cmd, &config_path, &config),
        command => command,
    };

    let backend: Arc<dyn ReviewBackend> = Arc::new(HttpBackend::new(HttpBackendOptions {
        base_url: config.api.base_url.clone(),
        timeout: config.api.timeout(),
        session_cookie: config.api.session_cookie.clone(),
    })?);

    match command {
        cli::Commands::Queue { format, pending } => {
            commands::queue::handle(backend, &format, pending).await
        }
        cli::Commands::Approve { chunk_id } => {
            commands::review::single(backend, Decision::Approve, chunk_id).await
        }
        cli::Commands::Reject { chunk_id } => {
            commands::review::single(backend, Decision::Reject, chunk_id).await
        }
        cli::Commands::BulkApprove { chunk_ids } => {
            commands::review::bulk(backend, Decision::Approve, chunk_ids).await
        }
        cli::Commands::BulkReject { chunk_ids } => {
            commands::review::bulk(backend, Decision::Reject, chunk_ids).await
        }
        cli::Commands::Ui => commands::ui::handle(backend, config.ui.show_redaction_legend).await,
        cli::Commands::Config(_) => Ok(()),
    }
}
