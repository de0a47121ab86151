// system-tests/src/fixtures.rs
// ============================================================================
// Module: Scenario Fixtures
// Description: Canonical credentials, service names, and case drafts.
// Purpose: Keep the suites aligned on one set of scenario inputs.
// Dependencies: casework-core
// ============================================================================

//! ## Overview
//! Fixed scenario inputs shared by every system-test suite: the test
//! backend's credential pair, the service names registered in the mock
//! catalog, and the case draft the end-to-end scenario creates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use casework_core::CaseDraft;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Username accepted by the test backend.
pub const TEST_USERNAME: &str = "test";
/// Password accepted by the test backend.
pub const TEST_PASSWORD: &str = "test";
/// Service the association scenario reconciles against.
pub const CARBON_SERVICE: &str = "carbon";
/// A second registered service with no scenario traffic.
pub const SILICON_SERVICE: &str = "silicon";

/// The case draft created by the end-to-end scenario.
#[must_use]
pub fn scenario_draft() -> CaseDraft {
    CaseDraft::new("T", "D", BTreeSet::from(["test".to_string()]))
}
