// crates/casework-client/src/catalog.rs
// ============================================================================
// Module: Casework Catalog Client
// Description: Read-only enumeration of registered services.
// Purpose: List the catalog and resolve services by name.
// Dependencies: casework-core
// ============================================================================

//! ## Overview
//! The catalog names the external systems capable of holding a case
//! association. It is externally managed and static within a session; the
//! client only enumerates it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use casework_core::STATUS_OK;
use casework_core::Service;
use casework_core::ServiceName;
use casework_core::envelope::decode_payload;

use crate::error::ClientError;
use crate::session::Session;

// ============================================================================
// SECTION: Catalog Client
// ============================================================================

/// Read-only client for the service catalog.
pub struct CatalogClient<'a> {
    /// Session issuing the requests.
    session: &'a Session,
}

impl<'a> CatalogClient<'a> {
    /// Creates a catalog client over a live session.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self {
            session,
        }
    }

    /// Enumerates the full service catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport or envelope failures.
    pub fn enumerate(&self) -> Result<Vec<Service>, ClientError> {
        let envelope = self.session.get("/api/services")?;
        match envelope.status {
            STATUS_OK => Ok(decode_payload(envelope.take_data()?)?),
            status => Err(ClientError::from_envelope_status(status)),
        }
    }

    /// Resolves a service by name; an unregistered name is a normal `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport or envelope failures.
    pub fn find(&self, name: &ServiceName) -> Result<Option<Service>, ClientError> {
        let services = self.enumerate()?;
        Ok(services.into_iter().find(|service| &service.name == name))
    }
}
