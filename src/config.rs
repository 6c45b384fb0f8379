//! Tool configuration: account credentials, service URL and HTTP timeout
//!
//! Values are resolved from CLI flags / environment first, then from an
//! optional JSON file in the user config directory.

use crate::error::AppError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_SERVICE: &str = "https://bsky.social";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Account handle and app password used once to create the session
#[derive(Debug)]
pub struct Credentials {
    /// Account handle (or DID) used as the login identifier
    pub handle: String,
    secret: SecretString,
}

impl Credentials {
    pub fn new(handle: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    pub fn secret(&self) -> &SecretString {
        &self.secret
    }
}

/// Resolved configuration injected into the search tool
#[derive(Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub service: String,
    pub timeout: Duration,
}

/// On-disk configuration file (`config.json`)
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub account_handle: Option<String>,
    #[serde(default)]
    pub account_secret: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub handle: Option<String>,
    pub app_password: Option<String>,
    pub service: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Configuration for the default service with the default timeout
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            service: DEFAULT_SERVICE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point the configuration at another PDS / entryway
    pub fn with_service(mut self, service: &str) -> Result<Self, AppError> {
        self.service = normalize_service(service)?;
        Ok(self)
    }

    /// Merge overrides over file values; credentials are mandatory
    pub fn resolve(overrides: ConfigOverrides, file: ConfigFile) -> Result<Self, AppError> {
        let handle = non_empty(overrides.handle)
            .or_else(|| non_empty(file.account_handle))
            .ok_or_else(|| {
                AppError::Config(
                    "account handle is not set (use --handle or BSKY_HANDLE)".to_string(),
                )
            })?;
        let secret = non_empty(overrides.app_password)
            .or_else(|| non_empty(file.account_secret))
            .ok_or_else(|| {
                AppError::Config(
                    "account secret is not set (use BSKY_APP_PASSWORD or the config file)"
                        .to_string(),
                )
            })?;

        let mut config = Config::new(Credentials::new(handle.trim_start_matches('@'), secret));
        if let Some(service) = non_empty(overrides.service).or_else(|| non_empty(file.service)) {
            config = config.with_service(&service)?;
        }
        if let Some(secs) = overrides.timeout_secs.or(file.timeout_secs) {
            if secs == 0 {
                return Err(AppError::Config("timeout must be at least 1 second".to_string()));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Load the config file (explicit path or default location) and apply overrides
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn load(overrides: ConfigOverrides, path: Option<&Path>) -> Result<Self, AppError> {
        let file = match path {
            Some(p) if !p.exists() => {
                return Err(AppError::Config(format!("Config file not found: {}", p.display())));
            }
            Some(p) => load_config_file(p)?,
            None => match config_path() {
                Some(p) => load_config_file(&p)?,
                None => ConfigFile::default(),
            },
        };
        Self::resolve(overrides, file)
    }
}

/// Get the path to the default configuration file
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bsky-search").join("config.json"))
}

/// Read a configuration file; a missing file yields the empty configuration
pub fn load_config_file(path: &Path) -> Result<ConfigFile, AppError> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let data = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&data).map_err(|e| {
        AppError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn normalize_service(service: &str) -> Result<String, AppError> {
    let url = Url::parse(service.trim())
        .map_err(|e| AppError::Config(format!("Invalid service URL '{}': {}", service, e)))?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(AppError::Config(format!(
            "Service URL must use http or https: {}",
            service
        )));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
