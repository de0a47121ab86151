// crates/casework-cli/src/config.rs
// ============================================================================
// Module: Casework Playbook Configuration
// Description: Configuration loading and validation for the playbook.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: casework-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Playbook settings resolve in three layers: explicit overrides (CLI flags)
//! win over values from an optional TOML file, which win over built-in
//! defaults. Missing or invalid configuration fails closed; oversized config
//! files are rejected before parsing. Credentials are opaque strings and are
//! redacted from debug output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use casework_core::ServiceName;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable used to select the config path.
pub const CONFIG_ENV_VAR: &str = "CASEWORK_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Minimum allowed request timeout in milliseconds.
pub const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum allowed request timeout in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 300_000;
/// Default backend API URL.
const DEFAULT_API_URL: &str = "http://iron.domain.lan/";
/// Default service name for the association scenario.
const DEFAULT_SERVICE_NAME: &str = "carbon";
/// Default credential value used by the test backend.
const DEFAULT_CREDENTIAL: &str = "test";
/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Explicit overrides, typically sourced from CLI flags.
///
/// # Invariants
/// - Every field is optional; unset fields fall through to the file layer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Overrides {
    /// Base URL of the backend API.
    pub api_url: Option<Url>,
    /// Service name used for the association scenario.
    pub service_name: Option<String>,
    /// Username to authenticate as.
    pub username: Option<String>,
    /// Password for the username.
    pub password: Option<String>,
    /// Uniform request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Raw configuration file shape.
///
/// # Invariants
/// - Every field is optional; unset fields fall through to defaults.
/// - Unknown keys are rejected rather than ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Base URL of the backend API.
    pub api_url: Option<String>,
    /// Service name used for the association scenario.
    pub service_name: Option<String>,
    /// Username to authenticate as.
    pub username: Option<String>,
    /// Password for the username.
    pub password: Option<String>,
    /// Uniform request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Resolved and validated playbook configuration.
///
/// # Invariants
/// - `api_url` is an absolute `http` or `https` URL.
/// - `timeout` lies within the configured bounds.
/// - Credentials are opaque strings and never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct PlaybookConfig {
    /// Base URL of the backend API.
    pub api_url: Url,
    /// Service name used for the association scenario.
    pub service_name: ServiceName,
    /// Username to authenticate as.
    pub username: String,
    /// Password for the username.
    pub password: String,
    /// Uniform request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for PlaybookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybookConfig")
            .field("api_url", &self.api_url.as_str())
            .field("service_name", &self.service_name.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration failures.
///
/// # Invariants
/// - Variants are stable for CLI error mapping and tests.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// The config file exceeds the size limit.
    #[error("config file too large: {path} ({actual_bytes} > {max_bytes})")]
    TooLarge {
        /// Offending file path.
        path: String,
        /// Actual size in bytes.
        actual_bytes: u64,
        /// Maximum size in bytes.
        max_bytes: usize,
    },
    /// The config file is not valid TOML for the expected shape.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The backend API URL is missing or unusable.
    #[error("invalid api url: {0}")]
    InvalidApiUrl(String),
    /// The username is empty.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// The service name is empty.
    #[error("service name must not be empty")]
    EmptyServiceName,
    /// The timeout lies outside the allowed bounds.
    #[error("timeout out of range: {actual_ms}ms not in [{min_ms}, {max_ms}]")]
    TimeoutOutOfRange {
        /// Requested timeout in milliseconds.
        actual_ms: u64,
        /// Minimum allowed timeout in milliseconds.
        min_ms: u64,
        /// Maximum allowed timeout in milliseconds.
        max_ms: u64,
    },
}

// ============================================================================
// SECTION: Loading and Resolution
// ============================================================================

/// Loads and parses a config file under the size limit.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file is unreadable, oversized, or not
/// valid TOML for the expected shape.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE as u64 {
        return Err(ConfigError::TooLarge {
            path: path.display().to_string(),
            actual_bytes: metadata.len(),
            max_bytes: MAX_CONFIG_FILE_SIZE,
        });
    }
    let raw = fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    toml::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))
}

/// Layers overrides over file values over defaults and validates the result.
///
/// # Errors
///
/// Returns [`ConfigError`] when a resolved value fails validation.
pub fn resolve(overrides: &Overrides, file: &FileConfig) -> Result<PlaybookConfig, ConfigError> {
    let api_url = match (&overrides.api_url, &file.api_url) {
        (Some(url), _) => url.clone(),
        (None, Some(raw)) => {
            Url::parse(raw).map_err(|err| ConfigError::InvalidApiUrl(err.to_string()))?
        }
        (None, None) => {
            Url::parse(DEFAULT_API_URL).map_err(|err| ConfigError::InvalidApiUrl(err.to_string()))?
        }
    };
    match api_url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ConfigError::InvalidApiUrl(format!("unsupported scheme: {scheme}")));
        }
    }
    let service_name = overrides
        .service_name
        .clone()
        .or_else(|| file.service_name.clone())
        .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());
    if service_name.trim().is_empty() {
        return Err(ConfigError::EmptyServiceName);
    }
    let username = overrides
        .username
        .clone()
        .or_else(|| file.username.clone())
        .unwrap_or_else(|| DEFAULT_CREDENTIAL.to_string());
    if username.trim().is_empty() {
        return Err(ConfigError::EmptyUsername);
    }
    let password = overrides
        .password
        .clone()
        .or_else(|| file.password.clone())
        .unwrap_or_else(|| DEFAULT_CREDENTIAL.to_string());
    if password.is_empty() {
        return Err(ConfigError::EmptyPassword);
    }
    let timeout_ms = overrides.timeout_ms.or(file.timeout_ms).unwrap_or(DEFAULT_TIMEOUT_MS);
    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&timeout_ms) {
        return Err(ConfigError::TimeoutOutOfRange {
            actual_ms: timeout_ms,
            min_ms: MIN_TIMEOUT_MS,
            max_ms: MAX_TIMEOUT_MS,
        });
    }
    Ok(PlaybookConfig {
        api_url,
        service_name: ServiceName::new(service_name),
        username,
        password,
        timeout: Duration::from_millis(timeout_ms),
    })
}
