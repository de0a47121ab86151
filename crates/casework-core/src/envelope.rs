// crates/casework-core/src/envelope.rs
// ============================================================================
// Module: Casework Response Envelope
// Description: Uniform status/data envelope carried by every backend reply.
// Purpose: Decode envelopes strictly and keep absent-vs-error distinct.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every backend response is a JSON object carrying a numeric `status` and a
//! `data` payload. A `status` other than 200 means "no data" — the payload,
//! when present on a failed reply, is never interpreted as partial data.
//! Decoding fails closed: bodies that are not a well-formed envelope are an
//! [`EnvelopeError`], not a guessed-at payload.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Status Codes
// ============================================================================

/// Envelope status for a successful operation.
pub const STATUS_OK: u16 = 200;
/// Envelope status for a payload the backend refused to accept.
pub const STATUS_VALIDATION: u16 = 400;
/// Envelope status for a missing or rejected session.
pub const STATUS_UNAUTHORIZED: u16 = 401;
/// Envelope status for a missing case or unregistered service.
pub const STATUS_NOT_FOUND: u16 = 404;
/// Envelope status for a sync against an already-present association.
pub const STATUS_CONFLICT: u16 = 409;

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Uniform response envelope.
///
/// # Invariants
/// - `status` of [`STATUS_OK`] is the only state in which `data` carries a
///   payload; on any other status the payload is ignored.
/// - `data` may be `null` on success for operations whose normal outcome is
///   "nothing found" (probe, logout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Numeric operation status mirroring HTTP semantics.
    pub status: u16,
    /// Payload for successful replies; `null` or absent otherwise.
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Decodes an envelope from raw response bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Malformed`] when the bytes are not a
    /// well-formed envelope object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        serde_json::from_slice(bytes).map_err(|err| EnvelopeError::Malformed(err.to_string()))
    }

    /// Returns true when the envelope reports success.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Takes the data payload of a successful envelope.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::MissingData`] when the envelope reports
    /// success without a payload.
    pub fn take_data(self) -> Result<Value, EnvelopeError> {
        self.data.ok_or(EnvelopeError::MissingData {
            status: self.status,
        })
    }
}

/// Decodes a typed payload out of an envelope `data` value.
///
/// # Errors
///
/// Returns [`EnvelopeError::Payload`] when the value does not match the
/// expected shape.
pub fn decode_payload<T: DeserializeOwned>(value: Value) -> Result<T, EnvelopeError> {
    serde_json::from_value(value).map_err(|err| EnvelopeError::Payload(err.to_string()))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Envelope decoding failures.
///
/// # Invariants
/// - Variants are stable for client error mapping and tests.
/// - Messages may embed untrusted backend text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The response body is not a well-formed envelope.
    #[error("malformed response envelope: {0}")]
    Malformed(String),
    /// A successful envelope arrived without its payload.
    #[error("missing data payload for status {status}")]
    MissingData {
        /// Status reported by the envelope.
        status: u16,
    },
    /// The data payload does not match the expected shape.
    #[error("unexpected data payload shape: {0}")]
    Payload(String),
}
