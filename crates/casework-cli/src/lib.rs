// crates/casework-cli/src/lib.rs
// ============================================================================
// Module: Casework CLI Library
// Description: Playbook orchestration, configuration, and telemetry.
// Purpose: Expose the playbook so system tests can drive it end to end.
// Dependencies: crate::{config, playbook, telemetry}
// ============================================================================

//! ## Overview
//! The CLI library hosts everything the `casework` binary does apart from
//! argument parsing: configuration resolution (flags over file over
//! defaults), the playbook scenarios, and tracing setup. System tests link
//! against this library to run the full playbook against a mock backend.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod playbook;
pub mod telemetry;
