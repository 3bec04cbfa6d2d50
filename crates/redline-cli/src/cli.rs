use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redline")]
#[command(about = "Review redacted document chunks before they are trusted", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Review API base URL (overrides config)
    #[arg(long, global = true, env = "REDLINE_API_URL")]
    pub api_url: Option<String>,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the review queue with highlighted redactions
    Queue {
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Only list pending chunks
        #[arg(long)]
        pending: bool,
    },

    /// Approve a single pending chunk
    Approve {
        /// Chunk ID
        chunk_id: String,
    },

    /// Reject a single pending chunk
    Reject {
        /// Chunk ID
        chunk_id: String,
    },

    /// Approve several pending chunks in one request
    BulkApprove {
        /// Chunk IDs
        #[arg(required = true)]
        chunk_ids: Vec<String>,
    },

    /// Reject several pending chunks in one request
    BulkReject {
        /// Chunk IDs
        #[arg(required = true)]
        chunk_ids: Vec<String>,
    },

    /// Interactive review queue
    Ui,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

impl Commands {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Commands::Ui)
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the config file path
    Path,

    /// Print the effective configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bulk_approve() {
        let cli = Cli::try_parse_from(["redline", "bulk-approve", "doc-1", "doc-2"]).unwrap();
        match cli.command {
            Commands::BulkApprove { chunk_ids } => assert_eq!(chunk_ids, vec!["doc-1", "doc-2"]),
            _ => panic!("expected bulk-approve"),
        }
    }

    #[test]
    fn test_bulk_requires_ids() {
        assert!(Cli::try_parse_from(["redline", "bulk-reject"]).is_err());
    }

    #[test]
    fn test_global_api_url() {
        let cli =
            Cli::try_parse_from(["redline", "queue", "--api-url", "http://review:8000"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://review:8000"));
        assert!(!cli.command.is_interactive());
    }
}
