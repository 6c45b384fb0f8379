//! bsky-search MCP Server & CLI (Rust)
//!
//! Dual-mode application:
//! - MCP Server Mode (no command): Model Context Protocol server using stdio
//! - CLI Mode (`search`): run one search and print the result
//!
//! Implements one tool:
//! - `bsky_search(query, limit)` - Search BlueSky posts by keyword

mod bluesky;
mod cli;
mod config;
mod error;
mod http;
mod mcp;
mod tools;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, SearchCommand};
use config::Config;
use error::AppError;
use std::sync::Arc;
use tools::result::{SearchResult, SearchStatus};
use tools::search::BskySearch;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let outcome = match load_and_connect(&cli).await {
        Ok(tool) => match cli.command {
            Some(Commands::Search(cmd)) => run_search(&tool, cmd).await,
            None => run_mcp_mode(tool).await.map_err(AppError::from),
        },
        Err(e) => Err(e),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

/// Initialize logging based on verbosity flags; RUST_LOG takes precedence
fn init_logging(cli: &Cli) {
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();
}

/// Resolve configuration and log in once
async fn load_and_connect(cli: &Cli) -> Result<BskySearch, AppError> {
    let config = Config::load(cli.overrides(), cli.config.as_deref())?;
    info!("Connecting to {} as @{}", config.service, config.credentials.handle);
    BskySearch::connect(&config).await
}

/// Execute search command in CLI mode; returns the process exit code
async fn run_search(tool: &BskySearch, cmd: SearchCommand) -> Result<i32, AppError> {
    let result = tools::search::execute_search(tool, cmd.args).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result);
    }

    Ok(search_exit_code(&result))
}

/// A search that failed upstream is an API error
fn search_exit_code(result: &SearchResult) -> i32 {
    match result.status() {
        SearchStatus::Success => {
            debug!(
                "Printed {} of {} posts for {:?}",
                result.results().len(),
                result.total_results(),
                result.query()
            );
            0
        }
        SearchStatus::Error => {
            warn!(
                "Search for {:?} failed: {}",
                result.query(),
                result.error().unwrap_or_default()
            );
            2
        }
    }
}

/// Map AppError to exit code
fn get_exit_code(err: &AppError) -> i32 {
    match err {
        AppError::Config(_) => 1,
        AppError::NetworkError(_) | AppError::ParseError(_) => 2,
        AppError::AuthenticationFailed(_) => 3,
        AppError::Timeout(_) => 4,
        AppError::Internal(_) => 5,
    }
}

/// Run in MCP server mode
async fn run_mcp_mode(tool: BskySearch) -> Result<i32> {
    info!("Starting bsky-search MCP Server");

    mcp::handle_stdio(Arc::new(tool)).await?;

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(get_exit_code(&AppError::Config("x".into())), 1);
        assert_eq!(get_exit_code(&AppError::NetworkError("x".into())), 2);
        assert_eq!(get_exit_code(&AppError::AuthenticationFailed("x".into())), 3);
        assert_eq!(get_exit_code(&AppError::Timeout("x".into())), 4);
        assert_eq!(get_exit_code(&AppError::Internal("x".into())), 5);
    }

    #[test]
    fn test_search_exit_codes() {
        assert_eq!(search_exit_code(&SearchResult::success("cats", vec![])), 0);
        assert_eq!(search_exit_code(&SearchResult::failure("cats", "XRPC error 500")), 2);
    }
}
