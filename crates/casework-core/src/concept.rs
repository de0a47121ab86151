// crates/casework-core/src/concept.rs
// ============================================================================
// Module: Casework Concepts
// Description: Canonical concept types for the case-management contract.
// Purpose: Provide strongly typed cases, services, identities, and presence.
// Dependencies: serde, thiserror, uuid
// ============================================================================

//! ## Overview
//! This module defines the concept types exchanged with the case-management
//! backend. A `Case` is the primary managed resource, identified by a
//! server-assigned GUID that is immutable once assigned and never reused
//! after deletion. A `Service` is a named external system capable of holding
//! an association to a case; the catalog of services is read-only from the
//! client's perspective. `Presence` is the tagged present/absent fact linking
//! a case to a service.
//!
//! Draft validation runs client-side and fails closed before any request is
//! sent; backend payloads are untrusted and revalidated at scenario
//! boundaries rather than within these wrappers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum length of a case name in bytes.
pub const MAX_NAME_BYTES: usize = 256;
/// Maximum length of a case description in bytes.
pub const MAX_DESCRIPTION_BYTES: usize = 4096;
/// Maximum number of access-control tags on a case.
pub const MAX_ACS_TAGS: usize = 32;
/// Maximum length of a single access-control tag in bytes.
pub const MAX_ACS_TAG_BYTES: usize = 64;
/// Maximum length of a case report in bytes.
pub const MAX_REPORT_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Server-assigned case identifier.
///
/// # Invariants
/// - Assigned exactly once at creation and immutable thereafter.
/// - Never reused after the case is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseGuid(Uuid);

impl CaseGuid {
    /// Wraps an existing GUID value.
    #[must_use]
    pub const fn new(guid: Uuid) -> Self {
        Self(guid)
    }

    /// Returns the underlying GUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true when the GUID is the all-zero nil value.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for CaseGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for CaseGuid {
    fn from(value: Uuid) -> Self {
        Self::new(value)
    }
}

/// Unique service name within the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a new service name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ServiceName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ServiceName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Case Resource
// ============================================================================

/// Primary managed resource of the case-management backend.
///
/// # Invariants
/// - `guid` is server-assigned and immutable for the case's lifetime.
/// - All other fields are mutable and replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// Server-assigned case identifier.
    pub guid: CaseGuid,
    /// Optional external tracking identifier.
    pub tsid: Option<String>,
    /// Case display name.
    pub name: String,
    /// Case description.
    pub description: String,
    /// Access-control tags guarding the case.
    pub acs: BTreeSet<String>,
    /// Optional free-text report.
    pub report: Option<String>,
}

/// Client-authored case payload without a GUID.
///
/// # Invariants
/// - Carries no identifier; the backend assigns the GUID at creation.
/// - `validate` must pass before the draft is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDraft {
    /// Optional external tracking identifier.
    pub tsid: Option<String>,
    /// Case display name.
    pub name: String,
    /// Case description.
    pub description: String,
    /// Access-control tags guarding the case.
    pub acs: BTreeSet<String>,
    /// Optional free-text report.
    pub report: Option<String>,
}

impl CaseDraft {
    /// Creates a draft with the required fields and no report.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        acs: BTreeSet<String>,
    ) -> Self {
        Self {
            tsid: None,
            name: name.into(),
            description: description.into(),
            acs,
            report: None,
        }
    }

    /// Sets the external tracking identifier.
    #[must_use]
    pub fn with_tsid(mut self, tsid: impl Into<String>) -> Self {
        self.tsid = Some(tsid.into());
        self
    }

    /// Sets the free-text report.
    #[must_use]
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report = Some(report.into());
        self
    }

    /// Validates the draft against the contract's required fields and limits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when a required field is missing or a
    /// limit is exceeded.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.name.len() > MAX_NAME_BYTES {
            return Err(ValidationError::NameTooLong {
                actual: self.name.len(),
                max: MAX_NAME_BYTES,
            });
        }
        if self.description.len() > MAX_DESCRIPTION_BYTES {
            return Err(ValidationError::DescriptionTooLong {
                actual: self.description.len(),
                max: MAX_DESCRIPTION_BYTES,
            });
        }
        if self.acs.is_empty() {
            return Err(ValidationError::EmptyAcs);
        }
        if self.acs.len() > MAX_ACS_TAGS {
            return Err(ValidationError::TooManyAcsTags {
                actual: self.acs.len(),
                max: MAX_ACS_TAGS,
            });
        }
        for tag in &self.acs {
            if tag.trim().is_empty() {
                return Err(ValidationError::EmptyAcsTag);
            }
            if tag.len() > MAX_ACS_TAG_BYTES {
                return Err(ValidationError::AcsTagTooLong {
                    actual: tag.len(),
                    max: MAX_ACS_TAG_BYTES,
                });
            }
        }
        if let Some(report) = &self.report
            && report.len() > MAX_REPORT_BYTES
        {
            return Err(ValidationError::ReportTooLong {
                actual: report.len(),
                max: MAX_REPORT_BYTES,
            });
        }
        Ok(())
    }
}

/// Draft validation failures.
///
/// # Invariants
/// - Variants are stable for playbook error mapping and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The case name is missing or blank.
    #[error("case name is empty")]
    EmptyName,
    /// The case name exceeds the size limit.
    #[error("case name too long ({actual} > {max})")]
    NameTooLong {
        /// Actual size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        max: usize,
    },
    /// The case description exceeds the size limit.
    #[error("case description too long ({actual} > {max})")]
    DescriptionTooLong {
        /// Actual size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        max: usize,
    },
    /// The access-control tag set is empty.
    #[error("case acs tags are empty")]
    EmptyAcs,
    /// An access-control tag is blank.
    #[error("case acs tag is empty")]
    EmptyAcsTag,
    /// The access-control tag set exceeds the entry limit.
    #[error("too many case acs tags ({actual} > {max})")]
    TooManyAcsTags {
        /// Actual number of tags.
        actual: usize,
        /// Maximum number of tags.
        max: usize,
    },
    /// An access-control tag exceeds the size limit.
    #[error("case acs tag too long ({actual} > {max})")]
    AcsTagTooLong {
        /// Actual size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        max: usize,
    },
    /// The report exceeds the size limit.
    #[error("case report too long ({actual} > {max})")]
    ReportTooLong {
        /// Actual size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        max: usize,
    },
    /// The backend rejected the payload after client-side checks passed.
    #[error("backend rejected case payload: {0}")]
    Rejected(String),
}

// ============================================================================
// SECTION: Catalog and Identity
// ============================================================================

/// Read-only catalog entry naming an external system.
///
/// # Invariants
/// - `name` is unique within the catalog.
/// - Catalog entries are enumerated, never created or mutated by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique service name.
    pub name: ServiceName,
}

/// Authenticated principal returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Username the session is bound to.
    pub username: String,
}

// ============================================================================
// SECTION: Association Presence
// ============================================================================

/// Tagged present/absent fact for a (case, service) pair.
///
/// # Invariants
/// - `Present` carries the case representation as known to the service.
/// - Observation never mutates the association state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// The case is present inside the service.
    Present(Case),
    /// The case is absent from the service.
    Absent,
}

impl Presence {
    /// Returns true when the case is present inside the service.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns the present case representation, if any.
    #[must_use]
    pub const fn case(&self) -> Option<&Case> {
        match self {
            Self::Present(case) => Some(case),
            Self::Absent => None,
        }
    }

    /// Consumes the presence fact and returns the case, if present.
    #[must_use]
    pub fn into_case(self) -> Option<Case> {
        match self {
            Self::Present(case) => Some(case),
            Self::Absent => None,
        }
    }
}
