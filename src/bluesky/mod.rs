//! Bluesky/ATProto XRPC access: session login, post search and response parsing

pub mod client;
pub mod records;
pub mod session;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while talking to the Bluesky service
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("XRPC error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Upstream post search capability
///
/// Returns the raw `app.bsky.feed.searchPosts` body; shape validation happens
/// in [`records::parse_search_posts`].
#[async_trait]
pub trait PostSearch: Send + Sync {
    async fn search_posts(&self, query: &str, limit: u32) -> Result<Value, ClientError>;
}

/// Build the XRPC endpoint URL for a method on the given service
pub fn xrpc_url(service: &str, nsid: &str) -> String {
    format!("{}/xrpc/{}", service.trim_end_matches('/'), nsid)
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-process stand-ins for the Bluesky service used across tests

    use super::{ClientError, PostSearch};
    use async_trait::async_trait;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub const HANDLE: &str = "alice.test";
    pub const PASSWORD: &str = "app-pass-1234";
    pub const ACCESS_JWT: &str = "access-token-123";

    /// Canned `PostSearch` that records every call it receives
    pub struct FakeSearch {
        outcome: Result<Value, (u16, String)>,
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl FakeSearch {
        pub fn responding(body: Value) -> Self {
            Self {
                outcome: Ok(body),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(status: u16, body: &str) -> Self {
            Self {
                outcome: Err((status, body.to_string())),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<(String, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PostSearch for FakeSearch {
        async fn search_posts(&self, query: &str, limit: u32) -> Result<Value, ClientError> {
            self.calls.lock().unwrap().push((query.to_string(), limit));
            match &self.outcome {
                Ok(body) => Ok(body.clone()),
                Err((status, body)) => Err(ClientError::Http {
                    status: *status,
                    body: body.clone(),
                }),
            }
        }
    }

    /// Two-post response body used by the formatting round trip
    pub fn alice_and_bob() -> Value {
        json!({
            "posts": [
                { "author": { "handle": "alice" }, "record": { "text": "hi" } },
                { "author": { "handle": "bob" }, "record": { "text": "yo" } }
            ]
        })
    }

    async fn create_session(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["identifier"] == HANDLE && body["password"] == PASSWORD {
            (
                StatusCode::OK,
                Json(json!({
                    "accessJwt": ACCESS_JWT,
                    "refreshJwt": "refresh-token-456",
                    "handle": HANDLE,
                    "did": "did:plc:alice"
                })),
            )
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "AuthenticationRequired",
                    "message": "Invalid identifier or password"
                })),
            )
        }
    }

    async fn search_posts(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", ACCESS_JWT))
            .unwrap_or(false);
        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "AuthRequired", "message": "Authentication Required" })),
            );
        }

        let q = params.get("q").cloned().unwrap_or_default();
        let limit = params.get("limit").cloned().unwrap_or_default();
        if q == "explode" {
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "UpstreamFailure" })),
            );
        }
        if q == "garbled" {
            return (
                StatusCode::OK,
                Json(json!({ "posts": [ { "author": { "did": "did:plc:x" } } ] })),
            );
        }

        (
            StatusCode::OK,
            Json(json!({
                "posts": [
                    {
                        "uri": "at://did:plc:alice/app.bsky.feed.post/1",
                        "author": { "did": "did:plc:alice", "handle": HANDLE },
                        "record": { "text": format!("q={} limit={}", q, limit) }
                    }
                ],
                "hitsTotal": 1
            })),
        )
    }

    /// Start a fake XRPC service on a random local port and return its base URL
    pub async fn spawn_service() -> String {
        let app = Router::new()
            .route("/xrpc/com.atproto.server.createSession", post(create_session))
            .route("/xrpc/app.bsky.feed.searchPosts", get(search_posts));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake service");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        format!("http://{}", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xrpc_url_joins_without_double_slash() {
        assert_eq!(
            xrpc_url("https://bsky.social/", "app.bsky.feed.searchPosts"),
            "https://bsky.social/xrpc/app.bsky.feed.searchPosts"
        );
        assert_eq!(
            xrpc_url("http://127.0.0.1:8080", "com.atproto.server.createSession"),
            "http://127.0.0.1:8080/xrpc/com.atproto.server.createSession"
        );
    }

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Http {
            status: 429,
            body: "RateLimitExceeded".to_string(),
        };
        assert_eq!(err.to_string(), "XRPC error 429: RateLimitExceeded");

        let err = ClientError::MalformedResponse("post 0 is missing 'record.text'".into());
        assert_eq!(
            err.to_string(),
            "Malformed response: post 0 is missing 'record.text'"
        );
    }
}
