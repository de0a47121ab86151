// crates/casework-cli/src/main.rs
// ============================================================================
// Module: Casework CLI Entry Point
// Description: Playbook orchestrator for the case-management backend.
// Purpose: Sequence login, case lifecycle, association lifecycle, logout.
// Dependencies: casework-cli, clap, tracing
// ============================================================================

//! ## Overview
//! The Casework CLI drives the backend through the full client contract:
//! it logs in, exercises the case resource lifecycle, reconciles a case's
//! presence inside a catalog service, and logs out on every exit path.
//! Settings come from CLI flags layered over an optional TOML file; every
//! input is validated fail-closed before the first request is sent.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use casework_cli::config;
use casework_cli::config::CONFIG_ENV_VAR;
use casework_cli::config::FileConfig;
use casework_cli::config::Overrides;
use casework_cli::playbook;
use casework_cli::playbook::PlaybookError;
use casework_cli::telemetry;
use clap::Parser;
use url::Url;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "casework", about = "Exercise a case-management backend end to end")]
struct Cli {
    /// Path to a TOML configuration file (overrides `CASEWORK_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Base URL of the backend API.
    #[arg(long, value_name = "URL")]
    api_url: Option<Url>,
    /// Service name used for the association scenario.
    #[arg(long, value_name = "NAME")]
    service_name: Option<String>,
    /// Username to authenticate as.
    #[arg(long, value_name = "USER")]
    username: Option<String>,
    /// Password for the username.
    #[arg(long, value_name = "PASS")]
    password: Option<String>,
    /// Uniform request timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

impl Cli {
    /// Maps the parsed flags into config overrides.
    fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            service_name: self.service_name.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout_ms: self.timeout_ms,
        }
    }

    /// Picks the config path from the flag or the environment.
    fn config_path(&self) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
    }
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init("info");
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "playbook failed");
            ExitCode::FAILURE
        }
    }
}

/// Resolves configuration and runs the playbook.
fn run(cli: &Cli) -> Result<(), PlaybookError> {
    let file = match cli.config_path() {
        Some(path) => config::load_file(&path)?,
        None => FileConfig::default(),
    };
    let resolved = config::resolve(&cli.overrides(), &file)?;
    playbook::run(&resolved)
}
