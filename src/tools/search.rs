//! Search tool implementation
//!
//! Implements the `bsky_search(query, limit)` MCP tool

use crate::bluesky::client::BskyClient;
use crate::bluesky::records::parse_search_posts;
use crate::bluesky::session::SessionManager;
use crate::bluesky::{ClientError, PostSearch};
use crate::cli::SearchArgs;
use crate::config::Config;
use crate::error::AppError;
use crate::http::client_with_timeout;
use crate::mcp::{McpResponse, ToolResult};
use crate::tools::result::{Post, SearchResult};
use serde_json::Value;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

/// Number of posts requested when the caller does not pass a limit
pub const DEFAULT_LIMIT: u32 = 10;

/// Upper bound a surface (MCP or CLI) waits for a single search call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Keyword search over BlueSky posts through one logged-in session
pub struct BskySearch {
    backend: Arc<dyn PostSearch>,
}

impl BskySearch {
    /// Log in once with the configured credentials and keep the session
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let http = client_with_timeout(config.timeout)?;
        let session = SessionManager::new(http.clone(), config.service.as_str())
            .login(&config.credentials)
            .await?;

        debug!("Session DID: {}", session.did);
        let client = BskyClient::new(http, session);
        info!("Logged in to {} as @{}", config.service, client.handle());

        Ok(Self::with_backend(Arc::new(client)))
    }

    /// Build the tool around any post search backend
    pub fn with_backend(backend: Arc<dyn PostSearch>) -> Self {
        Self { backend }
    }

    /// Run one search; failures are reported inside the returned result
    pub async fn execute(&self, query: &str, limit: Option<u32>) -> SearchResult {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        debug!("Search request: query={:?} limit={}", query, limit);

        match self.fetch_posts(query, limit).await {
            Ok(posts) => {
                info!("Search for {:?} returned {} posts", query, posts.len());
                SearchResult::success(query, posts)
            }
            Err(e) => {
                warn!("Search for {:?} failed: {}", query, e);
                SearchResult::failure(query, e.to_string())
            }
        }
    }

    async fn fetch_posts(&self, query: &str, limit: u32) -> Result<Vec<Post>, ClientError> {
        let body = self.backend.search_posts(query, limit).await?;
        let views = parse_search_posts(&body)?;
        Ok(views.into_iter().map(Post::from).collect())
    }
}

/// Handle bsky_search tool call
pub async fn handle_search(id: Option<Value>, args: Value, tool: &BskySearch) -> McpResponse {
    let search_args: SearchArgs = match serde_json::from_value(args) {
        Ok(args) => args,
        Err(e) => {
            return McpResponse::error(id, "invalid_params", &format!("Invalid arguments: {}", e))
        }
    };

    match execute_search(tool, search_args).await {
        Ok(result) => match serde_json::to_value(ToolResult::from_search(&result)) {
            Ok(value) => McpResponse::success(id, value),
            Err(e) => McpResponse::error(id, "internal_error", &e.to_string()),
        },
        Err(e) => McpResponse::error(id, e.error_code(), &e.message()),
    }
}

/// Execute search tool (shared implementation for MCP and CLI)
pub async fn execute_search(tool: &BskySearch, args: SearchArgs) -> Result<SearchResult, AppError> {
    timeout(REQUEST_TIMEOUT, tool.execute(&args.query, args.limit))
        .await
        .map_err(|_| AppError::Timeout("Search request exceeded 120 second timeout".to_string()))
}
