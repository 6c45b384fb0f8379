//! Session management for authenticated BlueSky sessions

use crate::bluesky::xrpc_url;
use crate::config::Credentials;
use crate::error::AppError;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

/// Session data from com.atproto.server.createSession
#[derive(Debug)]
pub struct Session {
    /// Access JWT token
    pub access_jwt: SecretString,

    /// User's handle
    pub handle: String,

    /// User's DID
    pub did: String,

    /// Service URL the session was created on
    pub service: String,
}

/// Response from com.atproto.server.createSession
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    access_jwt: String,
    handle: String,
    did: String,
}

/// Creates authenticated sessions with app passwords
pub struct SessionManager {
    client: reqwest::Client,
    service: String,
}

impl SessionManager {
    pub fn new(client: reqwest::Client, service: impl Into<String>) -> Self {
        Self {
            client,
            service: service.into(),
        }
    }

    /// Authenticate using app password and create a new session
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AppError> {
        let url = xrpc_url(&self.service, "com.atproto.server.createSession");
        debug!("Creating session for @{} at {}", credentials.handle, url);

        let body = serde_json::json!({
            "identifier": credentials.handle,
            "password": credentials.secret().expose_secret(),
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Login request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::AuthenticationFailed(format!(
                "Login failed with status {}: {}",
                status, error_text
            )));
        }

        let session_response: CreateSessionResponse = response
            .json()
            .await
            .map_err(|e| AppError::ParseError(format!("Failed to parse session response: {}", e)))?;

        Ok(Session {
            access_jwt: SecretString::from(session_response.access_jwt),
            handle: session_response.handle,
            did: session_response.did,
            service: self.service.clone(),
        })
    }
}
