//! CLI mode implementation
//!
//! Provides command-line interface for the bsky-search tool

use crate::config::ConfigOverrides;
use crate::tools::search::DEFAULT_LIMIT;
use clap::{Args, Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// bsky-search CLI
#[derive(Parser)]
#[command(name = "bsky-search")]
#[command(
    about = "Bluesky post search tool (MCP server when run without a command)",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Path to the JSON config file (defaults to <config dir>/bsky-search/config.json)
    #[arg(long, global = true, env = "BSKY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Account handle used to log in (alice.bsky.social)
    #[arg(short = 'u', long, global = true, env = "BSKY_HANDLE")]
    pub handle: Option<String>,

    /// App password for the account
    #[arg(long, global = true, env = "BSKY_APP_PASSWORD", hide_env_values = true)]
    pub app_password: Option<String>,

    /// Service URL (defaults to https://bsky.social)
    #[arg(short = 's', long, global = true, env = "BSKY_SERVICE")]
    pub service: Option<String>,

    /// HTTP request timeout in seconds (default 30)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Configuration values given on the command line or via environment
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            handle: self.handle.clone(),
            app_password: self.app_password.clone(),
            service: self.service.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search BlueSky posts by keyword
    Search(SearchCommand),
}

/// `search` subcommand: tool arguments plus output options
#[derive(Args, Debug)]
pub struct SearchCommand {
    #[command(flatten)]
    pub args: SearchArgs,

    /// Print the structured result as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Search tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SearchArgs {
    /// The search query for BlueSky posts
    #[arg(short = 'q', long)]
    #[schemars(description = "The search query for BlueSky posts.")]
    pub query: String,

    /// Number of posts to return (default 10)
    #[arg(short = 'l', long)]
    #[serde(default = "default_limit")]
    #[schemars(description = "Number of posts to return (default 10).")]
    pub limit: Option<u32>,
}

fn default_limit() -> Option<u32> {
    Some(DEFAULT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_args() {
        let args = SearchArgs {
            query: "rust programming".to_string(),
            limit: Some(10),
        };
        assert_eq!(args.query, "rust programming");
        assert_eq!(args.limit, Some(10));
    }

    #[test]
    fn test_search_args_limit_defaults_when_missing() {
        let args: SearchArgs = serde_json::from_value(json!({ "query": "cats" })).unwrap();
        assert_eq!(args.limit, Some(10));

        let args: SearchArgs =
            serde_json::from_value(json!({ "query": "cats", "limit": 40 })).unwrap();
        assert_eq!(args.limit, Some(40));
    }

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::try_parse_from([
            "bsky-search",
            "--handle",
            "alice.bsky.social",
            "search",
            "-q",
            "hello world",
            "-l",
            "5",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.handle.as_deref(), Some("alice.bsky.social"));
        match cli.command {
            Some(Commands::Search(cmd)) => {
                assert_eq!(cmd.args.query, "hello world");
                assert_eq!(cmd.args.limit, Some(5));
                assert!(cmd.json);
            }
            None => panic!("expected search command"),
        }
    }

    #[test]
    fn test_no_command_means_server_mode() {
        let cli = Cli::try_parse_from(["bsky-search", "--quiet"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.quiet);
    }

    #[test]
    fn test_overrides_carry_flags() {
        let cli = Cli::try_parse_from([
            "bsky-search",
            "--service",
            "https://pds.example",
            "--timeout",
            "12",
            "search",
            "-q",
            "x",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.service.as_deref(), Some("https://pds.example"));
        assert_eq!(overrides.timeout_secs, Some(12));
    }
}
