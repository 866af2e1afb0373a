//! `pipim update` - refresh pinned requirements
//!
//! Installs the loose requirements into a scratch environment with `-U`,
//! then freezes that environment into requirements.txt.

use miette::Result;
use std::path::Path;

use crate::cli::commands::{ensure_venv, REQUIREMENTS};
use crate::cli::log::Log;
use crate::core::venv::UPDATE_VENV;
use crate::core::{Config, PipimError, Venv};

pub fn run(file: &Path, config: &Config, log: &Log) -> Result<()> {
    log.note(format_args!(
        "Working in temporary {UPDATE_VENV} virtual environment..."
    ));
    let venv = Venv::new(UPDATE_VENV);
    ensure_venv(&venv, config, log)?;

    let install = venv.pip().args(["install", "-U", "-r"]).arg(file);
    log.note(format_args!("Running {install}"));
    install.capture()?;

    let freeze = venv.pip().arg("freeze");
    log.note(format_args!("Running {freeze}"));
    let requirements = freeze.capture()?;

    std::fs::write(REQUIREMENTS, requirements).map_err(PipimError::from)?;
    log.note(format_args!("Updated {REQUIREMENTS}"));

    venv.remove()?;
    log.note(format_args!("Removed {UPDATE_VENV}"));
    Ok(())
}
