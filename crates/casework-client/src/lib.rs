// crates/casework-client/src/lib.rs
// ============================================================================
// Module: Casework Client Library
// Description: Session-authenticated HTTP client for the case backend.
// Purpose: Expose the session lifecycle and the typed resource clients.
// Dependencies: crate::{association, case, catalog, error, session}
// ============================================================================

//! ## Overview
//! The Casework client wraps the case-management backend's HTTP surface in
//! typed operations. A [`Session`] is established by login and released by
//! logout (explicitly, or by the release guard on every other exit path);
//! [`CaseClient`], [`CatalogClient`], and [`AssociationClient`] borrow the
//! session and issue requests inside it. All operations are blocking and
//! sequential; nothing in the contract requires multiplexed concurrency.
//!
//! Backend responses are untrusted; envelope decoding fails closed and
//! non-success statuses never yield partial data.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod association;
pub mod case;
pub mod catalog;
pub mod error;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use association::AssociationClient;
pub use case::CaseClient;
pub use catalog::CatalogClient;
pub use error::ClientError;
pub use session::MAX_RESPONSE_BYTES;
pub use session::Session;
pub use session::SessionConfig;
