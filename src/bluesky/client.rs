//! BlueSky API client for post search

use crate::bluesky::session::Session;
use crate::bluesky::{xrpc_url, ClientError, PostSearch};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::debug;

/// Authenticated BlueSky API client
pub struct BskyClient {
    client: reqwest::Client,
    session: Session,
}

impl BskyClient {
    /// Wrap an HTTP client and an already established session
    pub fn new(client: reqwest::Client, session: Session) -> Self {
        Self { client, session }
    }

    /// Handle of the logged-in account
    pub fn handle(&self) -> &str {
        &self.session.handle
    }
}

#[async_trait]
impl PostSearch for BskyClient {
    /// Search posts using app.bsky.feed.searchPosts
    async fn search_posts(&self, query: &str, limit: u32) -> Result<Value, ClientError> {
        let url = xrpc_url(&self.session.service, "app.bsky.feed.searchPosts");
        let limit = limit.to_string();
        debug!("Searching posts: q={:?} limit={}", query, limit);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("limit", limit.as_str())])
            .bearer_auth(self.session.access_jwt.expose_secret())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
