// crates/casework-cli/src/playbook.rs
// ============================================================================
// Module: Casework Playbook
// Description: End-to-end scenarios asserting the client contract.
// Purpose: Sequence the case and association lifecycles inside one session.
// Dependencies: casework-client, casework-core, tracing
// ============================================================================

//! ## Overview
//! The playbook runs login, the case resource lifecycle, and the case/service
//! association lifecycle, asserting the expected state-machine transition
//! after each step. Assertion failures carry the step name and the last
//! observed state. Logout runs on every exit path: explicitly after the
//! scenarios, and through the session release guard if a step panics or the
//! playbook is torn down early. No step is retried; the first failure aborts
//! the remaining scenario and proceeds to teardown.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use casework_client::AssociationClient;
use casework_client::CaseClient;
use casework_client::CatalogClient;
use casework_client::ClientError;
use casework_client::Session;
use casework_client::SessionConfig;
use casework_core::CaseDraft;
use casework_core::CaseGuid;
use casework_core::Service;
use casework_core::ServiceName;
use thiserror::Error;

use crate::config::ConfigError;
use crate::config::PlaybookConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Playbook failures.
///
/// # Invariants
/// - Variants are stable for exit-code mapping and tests.
#[derive(Debug, Error)]
pub enum PlaybookError {
    /// Configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// A client operation failed.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    /// An observed state did not match the expected transition.
    #[error("scenario assertion failed at {step}: {detail}")]
    Assertion {
        /// Step whose expectation was violated.
        step: &'static str,
        /// Last observed state.
        detail: String,
    },
}

// ============================================================================
// SECTION: Orchestration
// ============================================================================

/// Runs the full playbook: login, scenarios, guaranteed logout.
///
/// # Errors
///
/// Returns [`PlaybookError`] when login fails (terminal) or a scenario step
/// fails. Logout failures are logged, never escalated.
pub fn run(config: &PlaybookConfig) -> Result<(), PlaybookError> {
    let mut session_config = SessionConfig::new(config.api_url.clone());
    session_config.timeout = config.timeout;
    let session = Session::login(&session_config, &config.username, &config.password)?;
    tracing::info!(username = %session.identity().username, "running playbook");

    let outcome = run_scenarios(&session, &config.service_name);

    match session.logout() {
        Ok(true) => {}
        Ok(false) => tracing::warn!("logout not acknowledged by backend"),
        Err(err) => tracing::warn!(error = %err, "logout failed"),
    }
    outcome
}

/// Runs the case and association scenarios in order.
fn run_scenarios(session: &Session, service_name: &ServiceName) -> Result<(), PlaybookError> {
    case_lifecycle(session)?;
    association_lifecycle(session, service_name)
}

// ============================================================================
// SECTION: Case Lifecycle Scenario
// ============================================================================

/// Creates, mutates, retrieves, and deletes a case, checking each step.
fn case_lifecycle(session: &Session) -> Result<(), PlaybookError> {
    let cases = CaseClient::new(session);

    let case = cases.create(&CaseDraft::new("T", "D", tags()))?;
    ensure(!case.guid.is_nil(), "create", "backend assigned a nil guid".to_string())?;
    tracing::info!(guid = %case.guid, "case created");

    let mut case = case;
    case.tsid = Some("#0000".to_string());
    case.report = Some("test case report".to_string());
    let case = cases.update(&case)?;
    ensure(
        case.report.as_deref() == Some("test case report"),
        "update",
        format!("report after update was {}", case.report.as_deref().unwrap_or("<none>")),
    )?;

    let retrieved = cases.retrieve(case.guid)?;
    let Some(retrieved) = retrieved else {
        return Err(PlaybookError::Assertion {
            step: "retrieve",
            detail: format!("case {} missing after update", case.guid),
        });
    };
    ensure(
        retrieved.report.as_deref() == Some("test case report"),
        "retrieve",
        format!("report was {}", retrieved.report.as_deref().unwrap_or("<none>")),
    )?;

    let deleted = cases.delete(case.guid)?;
    ensure(deleted, "delete", format!("case {} was not removed", case.guid))?;

    let remaining = cases.enumerate()?;
    ensure(
        remaining.iter().all(|entry| entry.guid != case.guid),
        "enumerate",
        format!("deleted case {} still enumerated", case.guid),
    )?;
    tracing::info!(guid = %case.guid, "case lifecycle complete");
    Ok(())
}

// ============================================================================
// SECTION: Association Lifecycle Scenario
// ============================================================================

/// Reconciles a dedicated case's presence inside the configured service.
///
/// Short-circuits with a logged error when the service is not registered;
/// the dedicated case is cleaned up regardless of the scenario outcome.
fn association_lifecycle(
    session: &Session,
    service_name: &ServiceName,
) -> Result<(), PlaybookError> {
    let catalog = CatalogClient::new(session);
    let Some(service) = catalog.find(service_name)? else {
        tracing::error!(service = %service_name, "service not registered; skipping association scenario");
        return Ok(());
    };

    let cases = CaseClient::new(session);
    let case = cases.create(&CaseDraft::new("T", "D", tags()))?;
    let outcome = association_round_trip(session, &service, case.guid);
    if let Err(err) = cases.delete(case.guid) {
        tracing::warn!(error = %err, guid = %case.guid, "scenario case cleanup failed");
    }
    outcome
}

/// Drives one absent → present → absent round trip, probing between steps.
fn association_round_trip(
    session: &Session,
    service: &Service,
    guid: CaseGuid,
) -> Result<(), PlaybookError> {
    let associations = AssociationClient::new(session);

    let presence = associations.probe(service, guid)?;
    ensure(
        !presence.is_present(),
        "probe",
        format!("case {guid} already present in service {}", service.name),
    )?;

    let synced = associations.sync(service, guid)?;
    tracing::info!(guid = %synced.guid, service = %service.name, "case synced");

    let presence = associations.probe(service, guid)?;
    ensure(
        presence.is_present(),
        "probe-after-sync",
        format!("case {guid} not present in service {} after sync", service.name),
    )?;

    let removed = associations.delete(service, guid)?;
    ensure(
        removed,
        "delete-association",
        format!("present association for case {guid} was not removed"),
    )?;

    let presence = associations.probe(service, guid)?;
    ensure(
        !presence.is_present(),
        "probe-after-delete",
        format!("case {guid} still present in service {} after delete", service.name),
    )?;
    tracing::info!(guid = %guid, service = %service.name, "association lifecycle complete");
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Access-control tags used by the playbook's scenario cases.
fn tags() -> BTreeSet<String> {
    BTreeSet::from(["test".to_string()])
}

/// Turns a violated expectation into an assertion failure.
fn ensure(condition: bool, step: &'static str, detail: String) -> Result<(), PlaybookError> {
    if condition {
        Ok(())
    } else {
        Err(PlaybookError::Assertion {
            step,
            detail,
        })
    }
}
