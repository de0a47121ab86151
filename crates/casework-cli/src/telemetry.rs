// crates/casework-cli/src/telemetry.rs
// ============================================================================
// Module: Casework Telemetry
// Description: Tracing subscriber setup for the playbook binary.
// Purpose: Install one stderr subscriber, honoring RUST_LOG overrides.
// Dependencies: tracing-subscriber
// ============================================================================

//! ## Overview
//! The binary installs a single `tracing` subscriber writing to stderr.
//! `RUST_LOG` overrides the default level filter. Library crates only emit
//! events; installation happens here, once, at process start.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// Installs the stderr subscriber with the given default level.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
