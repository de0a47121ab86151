// crates/casework-client/src/error.rs
// ============================================================================
// Module: Casework Client Errors
// Description: Error taxonomy for client operations against the backend.
// Purpose: Keep recoverable, terminal, and caller-bug failures distinct.
// Dependencies: casework-core, thiserror
// ============================================================================

//! ## Overview
//! One taxonomy covers every client operation. Authentication failures are
//! terminal for a playbook run; missing cases and unregistered services are
//! recoverable and the caller chooses whether to skip; validation failures
//! are caller bugs; transport failures surface as-is and are never retried
//! by the client. Not-found on read-style operations (retrieve, probe) is a
//! normal result and does not appear here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use casework_core::CaseGuid;
use casework_core::EnvelopeError;
use casework_core::STATUS_UNAUTHORIZED;
use casework_core::STATUS_VALIDATION;
use casework_core::ServiceName;
use casework_core::ValidationError;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Client operation failures.
///
/// # Invariants
/// - Variants are stable for playbook error mapping and tests.
/// - Messages may embed untrusted backend text.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client configuration is invalid.
    #[error("client config error: {0}")]
    Config(String),
    /// The backend rejected the credentials or the session is gone.
    #[error("authentication rejected by backend")]
    Authentication,
    /// A mutating operation referenced a case that no longer exists.
    #[error("case {0} not found")]
    CaseNotFound(CaseGuid),
    /// An association operation referenced an unregistered service.
    #[error("service {0} is not registered in the catalog")]
    ServiceNotFound(ServiceName),
    /// The case payload failed validation, client-side or server-side.
    #[error("case payload rejected: {0}")]
    Validation(#[from] ValidationError),
    /// A sync was issued against an already-present association.
    #[error("case {case} is already present in service {service}")]
    DuplicateAssociation {
        /// Service holding the association.
        service: ServiceName,
        /// Case already present in the service.
        case: CaseGuid,
    },
    /// The request could not be delivered or the response could not be read.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The response body was not a usable envelope.
    #[error("invalid response envelope: {0}")]
    Envelope(#[from] EnvelopeError),
    /// The envelope carried a status no operation maps.
    #[error("unexpected response status {status}")]
    Status {
        /// Status reported by the envelope.
        status: u16,
    },
}

impl ClientError {
    /// Maps an envelope status with no operation-specific meaning.
    ///
    /// Operations match their contextual statuses (404, 409) first and fall
    /// through to this for the rest.
    #[must_use]
    pub(crate) fn from_envelope_status(status: u16) -> Self {
        match status {
            STATUS_UNAUTHORIZED => Self::Authentication,
            STATUS_VALIDATION => {
                Self::Validation(ValidationError::Rejected(format!("envelope status {status}")))
            }
            status => Self::Status {
                status,
            },
        }
    }
}
