// crates/casework-client/src/session.rs
// ============================================================================
// Module: Casework Session
// Description: Authenticated session context over the backend HTTP surface.
// Purpose: Bind every request to one login and guarantee one logout.
// Dependencies: casework-core, reqwest, serde_json, tracing, url
// ============================================================================

//! ## Overview
//! A [`Session`] is created by [`Session::login`] and released by
//! [`Session::logout`]. Session affinity rides on a cookie set by the login
//! response; the blocking HTTP client carries a cookie store so every
//! subsequent request runs inside the authenticated context. Logout consumes
//! the session, so reuse after release is unrepresentable; the release guard
//! covers every other exit path, issuing exactly one best-effort logout and
//! logging (never escalating) its failure.
//!
//! The envelope in the response body is authoritative; transport-level
//! statuses are not interpreted beyond delivery success. Responses are read
//! under a hard size limit and redirects are refused.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use casework_core::Envelope;
use casework_core::Identity;
use casework_core::STATUS_OK;
use casework_core::STATUS_UNAUTHORIZED;
use casework_core::envelope::decode_payload;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde::Serialize;
use url::Url;

use crate::error::ClientError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size accepted from the backend.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Default request timeout applied uniformly to every operation.
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Default user agent string for outbound requests.
const DEFAULT_USER_AGENT: &str = "casework/0.1";
/// Login endpoint path.
const LOGIN_PATH: &str = "/api/auth/login";
/// Logout endpoint path.
const LOGOUT_PATH: &str = "/api/auth/logout";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for establishing a session.
///
/// # Invariants
/// - `api_url` must be an absolute `http` or `https` URL without embedded
///   credentials.
/// - `timeout` applies to the full lifecycle of every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Base URL of the backend API.
    pub api_url: Url,
    /// Uniform request timeout.
    pub timeout: Duration,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl SessionConfig {
    /// Creates a configuration with default timeout and user agent.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Validates scheme and credential policy for the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the URL is unusable.
    fn validate(&self) -> Result<(), ClientError> {
        match self.api_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ClientError::Config(format!("unsupported api url scheme: {scheme}")));
            }
        }
        if self.api_url.host_str().is_none() {
            return Err(ClientError::Config("api url host required".to_string()));
        }
        if !self.api_url.username().is_empty() || self.api_url.password().is_some() {
            return Err(ClientError::Config("api url credentials are not allowed".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Login Wire Types
// ============================================================================

/// Login request body; credentials ride under a top-level `data` key.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    /// Credential pair.
    data: Credentials<'a>,
}

/// Opaque credential pair submitted at login.
#[derive(Serialize)]
struct Credentials<'a> {
    /// Username to authenticate as.
    username: &'a str,
    /// Password for the username.
    password: &'a str,
}

impl std::fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Authenticated session context.
///
/// # Invariants
/// - Exactly one logout request is issued per successful login, on every
///   exit path.
/// - The session is not `Clone`; one login backs one context.
#[derive(Debug)]
pub struct Session {
    /// Cookie-bearing HTTP client bound to the login.
    http: Client,
    /// Base URL of the backend API.
    api_url: Url,
    /// Identity returned by the backend at login.
    identity: Identity,
    /// True until the session has been released.
    active: bool,
}

impl Session {
    /// Establishes a session with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Authentication`] when the credentials are
    /// rejected (terminal for a playbook run), [`ClientError::Transport`]
    /// when the backend is unreachable, and [`ClientError::Config`] when the
    /// configuration is unusable.
    pub fn login(
        config: &SessionConfig,
        username: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let http = build_client(config)?;
        let url = join_endpoint(&config.api_url, LOGIN_PATH)?;
        let body = LoginRequest {
            data: Credentials {
                username,
                password,
            },
        };
        let response = http
            .post(url.clone())
            .json(&body)
            .send()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        let envelope = read_envelope(&url, response)?;
        match envelope.status {
            STATUS_OK => {
                let identity: Identity = decode_payload(envelope.take_data()?)?;
                tracing::info!(username = %identity.username, "session established");
                Ok(Self {
                    http,
                    api_url: config.api_url.clone(),
                    identity,
                    active: true,
                })
            }
            STATUS_UNAUTHORIZED => Err(ClientError::Authentication),
            status => Err(ClientError::Status {
                status,
            }),
        }
    }

    /// Returns the identity the session is bound to.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Releases the session, consuming it.
    ///
    /// Returns whether the backend acknowledged the logout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the logout request cannot be delivered
    /// or its envelope cannot be decoded.
    pub fn logout(mut self) -> Result<bool, ClientError> {
        self.close()
    }

    /// Issues the logout request and marks the session released.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request or envelope fails.
    fn close(&mut self) -> Result<bool, ClientError> {
        self.active = false;
        let envelope = self.get(LOGOUT_PATH)?;
        let acknowledged = envelope.is_ok();
        tracing::info!(acknowledged, "session released");
        Ok(acknowledged)
    }

    // ------------------------------------------------------------------
    // Request plumbing shared by the typed clients.
    // ------------------------------------------------------------------

    /// Issues a GET request and decodes the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when transport or decoding fails.
    pub(crate) fn get(&self, path: &str) -> Result<Envelope, ClientError> {
        let url = join_endpoint(&self.api_url, path)?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        read_envelope(&url, response)
    }

    /// Issues a POST request with a JSON body and decodes the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when transport or decoding fails.
    pub(crate) fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Envelope, ClientError> {
        let url = join_endpoint(&self.api_url, path)?;
        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        read_envelope(&url, response)
    }

    /// Issues a bodiless POST request and decodes the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when transport or decoding fails.
    pub(crate) fn post(&self, path: &str) -> Result<Envelope, ClientError> {
        let url = join_endpoint(&self.api_url, path)?;
        let response = self
            .http
            .post(url.clone())
            .send()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        read_envelope(&url, response)
    }

    /// Issues a PUT request with a JSON body and decodes the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when transport or decoding fails.
    pub(crate) fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Envelope, ClientError> {
        let url = join_endpoint(&self.api_url, path)?;
        let response = self
            .http
            .put(url.clone())
            .json(body)
            .send()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        read_envelope(&url, response)
    }

    /// Issues a DELETE request and decodes the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when transport or decoding fails.
    pub(crate) fn delete(&self, path: &str) -> Result<Envelope, ClientError> {
        let url = join_endpoint(&self.api_url, path)?;
        let response = self
            .http
            .delete(url.clone())
            .send()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        read_envelope(&url, response)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        match self.close() {
            Ok(true) => {}
            Ok(false) => tracing::warn!("logout not acknowledged by backend"),
            Err(err) => tracing::warn!(error = %err, "logout failed during session release"),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the blocking HTTP client backing a session.
fn build_client(config: &SessionConfig) -> Result<Client, ClientError> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .redirect(Policy::none())
        .cookie_store(true)
        .build()
        .map_err(|_| ClientError::Transport("http client build failed".to_string()))
}

/// Joins an endpoint path onto the base API URL.
fn join_endpoint(api_url: &Url, path: &str) -> Result<Url, ClientError> {
    api_url
        .join(path)
        .map_err(|err| ClientError::Config(format!("invalid endpoint path {path}: {err}")))
}

/// Reads a response body under the size limit and decodes the envelope.
///
/// # Errors
///
/// Returns [`ClientError::Transport`] on redirects, read failures, or
/// oversized bodies, and [`ClientError::Envelope`] on malformed envelopes.
fn read_envelope(url: &Url, response: Response) -> Result<Envelope, ClientError> {
    if response.url() != url {
        return Err(ClientError::Transport(format!(
            "redirected from {} to {}",
            url,
            response.url()
        )));
    }
    if let Some(length) = response.content_length()
        && length > MAX_RESPONSE_BYTES as u64
    {
        return Err(ClientError::Transport(format!(
            "response exceeds size limit ({length} > {MAX_RESPONSE_BYTES})"
        )));
    }
    let mut limited = response.take(MAX_RESPONSE_BYTES as u64 + 1);
    let mut bytes = Vec::new();
    limited
        .read_to_end(&mut bytes)
        .map_err(|err| ClientError::Transport(err.to_string()))?;
    if bytes.len() > MAX_RESPONSE_BYTES {
        return Err(ClientError::Transport(format!(
            "response exceeds size limit ({} > {MAX_RESPONSE_BYTES})",
            bytes.len()
        )));
    }
    Ok(Envelope::from_slice(&bytes)?)
}
