//! `person-registry` command line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Open the registry database and run one command.
//! - Map domain outcomes to stable exit codes.

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use log::{error, info};
use registry_core::db::{open_db, open_db_in_memory};
use registry_core::{
    default_log_level, init_logging, RegistryError, RegistryService, ValidationError,
};
use std::process::ExitCode;

const EXIT_FAILURE: u8 = 1;
const EXIT_VALIDATION: u8 = 2;
const EXIT_NOT_FOUND: u8 = 3;
const EXIT_DUPLICATE: u8 = 4;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        registry_core::core_version()
    );

    let conn = if cli.in_memory {
        open_db_in_memory().context("failed to open in-memory registry database")?
    } else {
        open_db(&cli.db)
            .with_context(|| format!("failed to open registry database `{}`", cli.db.display()))?
    };
    let service = RegistryService::try_new(&conn)?;

    if let Some(output) = commands::execute(&service, cli.command)? {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ValidationError>().is_some() {
        return EXIT_VALIDATION;
    }
    match err.downcast_ref::<RegistryError>() {
        Some(RegistryError::NotFound(_)) => EXIT_NOT_FOUND,
        Some(RegistryError::DuplicateKey(_)) => EXIT_DUPLICATE,
        _ => EXIT_FAILURE,
    }
}
