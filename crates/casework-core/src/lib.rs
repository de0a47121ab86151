// crates/casework-core/src/lib.rs
// ============================================================================
// Module: Casework Core Library
// Description: Public API surface for the Casework core.
// Purpose: Expose concept types, draft validation, and the response envelope.
// Dependencies: crate::{concept, envelope}
// ============================================================================

//! ## Overview
//! Casework core defines the concept types shared by the client and the
//! playbook: the `Case` resource and its draft form, the `Service` catalog
//! entry, the authenticated `Identity`, and the tagged `Presence` fact for
//! case/service associations. It also defines the response envelope every
//! backend reply is wrapped in. The core is transport-agnostic; the HTTP
//! client lives in `casework-client`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod concept;
pub mod envelope;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use concept::Case;
pub use concept::CaseDraft;
pub use concept::CaseGuid;
pub use concept::Identity;
pub use concept::Presence;
pub use concept::Service;
pub use concept::ServiceName;
pub use concept::ValidationError;
pub use envelope::Envelope;
pub use envelope::EnvelopeError;
pub use envelope::STATUS_CONFLICT;
pub use envelope::STATUS_NOT_FOUND;
pub use envelope::STATUS_OK;
pub use envelope::STATUS_UNAUTHORIZED;
pub use envelope::STATUS_VALIDATION;
