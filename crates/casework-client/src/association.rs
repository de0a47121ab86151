// crates/casework-client/src/association.rs
// ============================================================================
// Module: Casework Association Client
// Description: Probe/sync/delete of a case's presence inside a service.
// Purpose: Drive the per-(case, service) absent/present state machine.
// Dependencies: casework-core, serde
// ============================================================================

//! ## Overview
//! Each (case GUID, service name) pair is either absent or present; pairs
//! start absent. `probe` observes without mutating and is safe in any state.
//! `sync` transitions absent to present and pushes the case's current data
//! into the service; syncing an already-present pair is a conflict the
//! backend reports explicitly, so callers probe before syncing. `delete`
//! transitions present to absent and never touches the case itself.
//!
//! A 404 on any association route means the service is not registered in
//! the catalog; the operation fails fast rather than no-oping.

// ============================================================================
// SECTION: Imports
// ============================================================================

use casework_core::Case;
use casework_core::CaseGuid;
use casework_core::Presence;
use casework_core::STATUS_CONFLICT;
use casework_core::STATUS_NOT_FOUND;
use casework_core::STATUS_OK;
use casework_core::Service;
use casework_core::envelope::decode_payload;
use serde::Deserialize;

use crate::error::ClientError;
use crate::session::Session;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Payload wrapper carrying the case as known to a service.
#[derive(Debug, Deserialize)]
struct ServiceCasePayload {
    /// Case representation held by the service.
    case: Case,
}

// ============================================================================
// SECTION: Association Client
// ============================================================================

/// Client for the case/service association state machine.
pub struct AssociationClient<'a> {
    /// Session issuing the requests.
    session: &'a Session,
}

impl<'a> AssociationClient<'a> {
    /// Creates an association client over a live session.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self {
            session,
        }
    }

    /// Observes whether the case is present inside the service.
    ///
    /// Read-only and idempotent; absence is a normal [`Presence::Absent`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ServiceNotFound`] when the service is not
    /// registered, and [`ClientError`] for transport or envelope failures.
    pub fn probe(&self, service: &Service, guid: CaseGuid) -> Result<Presence, ClientError> {
        let envelope = self.session.get(&route(service, guid))?;
        match envelope.status {
            STATUS_OK => match envelope.data {
                Some(value) => {
                    let payload: ServiceCasePayload = decode_payload(value)?;
                    Ok(Presence::Present(payload.case))
                }
                None => Ok(Presence::Absent),
            },
            STATUS_NOT_FOUND => Err(ClientError::ServiceNotFound(service.name.clone())),
            status => Err(ClientError::from_envelope_status(status)),
        }
    }

    /// Establishes the association, pushing the case into the service.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::DuplicateAssociation`] when the pair is
    /// already present, [`ClientError::ServiceNotFound`] when the service is
    /// not registered, and [`ClientError`] for transport or envelope
    /// failures.
    pub fn sync(&self, service: &Service, guid: CaseGuid) -> Result<Case, ClientError> {
        let envelope = self.session.post(&route(service, guid))?;
        match envelope.status {
            STATUS_OK => {
                let payload: ServiceCasePayload = decode_payload(envelope.take_data()?)?;
                tracing::debug!(service = %service.name, %guid, "case synced into service");
                Ok(payload.case)
            }
            STATUS_CONFLICT => Err(ClientError::DuplicateAssociation {
                service: service.name.clone(),
                case: guid,
            }),
            STATUS_NOT_FOUND => Err(ClientError::ServiceNotFound(service.name.clone())),
            status => Err(ClientError::from_envelope_status(status)),
        }
    }

    /// Revokes the association; returns whether a present pair was removed.
    ///
    /// The case itself is never deleted. Deleting an absent pair is
    /// `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ServiceNotFound`] when the service is not
    /// registered, and [`ClientError`] for transport or envelope failures.
    pub fn delete(&self, service: &Service, guid: CaseGuid) -> Result<bool, ClientError> {
        let envelope = self.session.delete(&route(service, guid))?;
        match envelope.status {
            STATUS_OK => {
                let deleted: bool = decode_payload(envelope.take_data()?)?;
                tracing::debug!(service = %service.name, %guid, deleted, "association delete issued");
                Ok(deleted)
            }
            STATUS_NOT_FOUND => Err(ClientError::ServiceNotFound(service.name.clone())),
            status => Err(ClientError::from_envelope_status(status)),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the service-scoped route for a (service, case) pair.
fn route(service: &Service, guid: CaseGuid) -> String {
    format!("/api/service/{}/case/{}", service.name, guid)
}
