// crates/casework-client/src/case.rs
// ============================================================================
// Module: Casework Case Client
// Description: Typed CRUD operations over the case resource.
// Purpose: Create, retrieve, update, delete, and enumerate cases.
// Dependencies: casework-core, serde
// ============================================================================

//! ## Overview
//! `CaseClient` issues the case-resource operations inside a live session.
//! Creation validates the draft client-side before any request is sent; the
//! backend assigns the GUID. Retrieval treats "not found" as a normal
//! `None`, never an error. Updates replace every mutable field wholesale.
//! Deletion reports whether a case existed; deleting a missing GUID is
//! `false`, not a failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use casework_core::Case;
use casework_core::CaseDraft;
use casework_core::CaseGuid;
use casework_core::STATUS_NOT_FOUND;
use casework_core::STATUS_OK;
use casework_core::envelope::decode_payload;
use serde::Deserialize;

use crate::error::ClientError;
use crate::session::Session;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Payload wrapper carrying a single case.
#[derive(Debug, Deserialize)]
struct CasePayload {
    /// Case representation returned by the backend.
    case: Case,
}

// ============================================================================
// SECTION: Case Client
// ============================================================================

/// Typed CRUD client for the case resource.
pub struct CaseClient<'a> {
    /// Session issuing the requests.
    session: &'a Session,
}

impl<'a> CaseClient<'a> {
    /// Creates a case client over a live session.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self {
            session,
        }
    }

    /// Creates a case from a draft; the backend assigns the GUID.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] when the draft fails client-side
    /// checks or the backend refuses the payload, and [`ClientError`] for
    /// transport or envelope failures.
    pub fn create(&self, draft: &CaseDraft) -> Result<Case, ClientError> {
        draft.validate()?;
        let envelope = self.session.post_json("/api/case", draft)?;
        match envelope.status {
            STATUS_OK => {
                let payload: CasePayload = decode_payload(envelope.take_data()?)?;
                tracing::debug!(guid = %payload.case.guid, "case created");
                Ok(payload.case)
            }
            status => Err(ClientError::from_envelope_status(status)),
        }
    }

    /// Retrieves a case by GUID; a missing case is a normal `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport or envelope failures.
    pub fn retrieve(&self, guid: CaseGuid) -> Result<Option<Case>, ClientError> {
        let envelope = self.session.get(&format!("/api/case/{guid}"))?;
        match envelope.status {
            STATUS_OK => {
                let payload: CasePayload = decode_payload(envelope.take_data()?)?;
                Ok(Some(payload.case))
            }
            STATUS_NOT_FOUND => Ok(None),
            status => Err(ClientError::from_envelope_status(status)),
        }
    }

    /// Replaces every mutable field of an existing case.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CaseNotFound`] when the GUID no longer exists,
    /// and [`ClientError`] for transport or envelope failures.
    pub fn update(&self, case: &Case) -> Result<Case, ClientError> {
        let envelope = self.session.put_json(&format!("/api/case/{}", case.guid), case)?;
        match envelope.status {
            STATUS_OK => {
                let payload: CasePayload = decode_payload(envelope.take_data()?)?;
                Ok(payload.case)
            }
            STATUS_NOT_FOUND => Err(ClientError::CaseNotFound(case.guid)),
            status => Err(ClientError::from_envelope_status(status)),
        }
    }

    /// Deletes a case; returns whether a case existed and was removed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport or envelope failures. Deleting
    /// a missing GUID is `Ok(false)`, not an error.
    pub fn delete(&self, guid: CaseGuid) -> Result<bool, ClientError> {
        let envelope = self.session.delete(&format!("/api/case/{guid}"))?;
        match envelope.status {
            STATUS_OK => {
                let deleted: bool = decode_payload(envelope.take_data()?)?;
                tracing::debug!(%guid, deleted, "case delete issued");
                Ok(deleted)
            }
            status => Err(ClientError::from_envelope_status(status)),
        }
    }

    /// Enumerates all cases visible to the session.
    ///
    /// Ordering is not meaningful across calls.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport or envelope failures.
    pub fn enumerate(&self) -> Result<Vec<Case>, ClientError> {
        let envelope = self.session.get("/api/cases")?;
        match envelope.status {
            STATUS_OK => Ok(decode_payload(envelope.take_data()?)?),
            status => Err(ClientError::from_envelope_status(status)),
        }
    }
}
