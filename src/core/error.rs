//! Error types shared by the core and the command layer

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can make pipim stop before handing over to pip
#[derive(Debug, Error, Diagnostic)]
pub enum PipimError {
    #[error(
        "Update command takes either a requirements.txt-like file as parameter or no parameters at all"
    )]
    #[diagnostic(code(pipim::update::arity), help("run `pipim help` for usage"))]
    UpdateArity,

    #[error("File {} not found", .0.display())]
    #[diagnostic(code(pipim::update::file_not_found))]
    FileNotFound(PathBuf),

    #[error("No requirements.txt found, exiting")]
    #[diagnostic(
        code(pipim::install::no_requirements),
        help("pass package names to `pipim install`, or create a requirements.txt")
    )]
    NoRequirements,

    #[error("{} already exists", .0.display())]
    #[diagnostic(code(pipim::shim::exists))]
    ShimExists(PathBuf),

    #[error("Could not determine the home directory")]
    #[diagnostic(code(pipim::shim::no_home))]
    HomeNotFound,

    #[error("Failed to create virtual environment at {}", path.display())]
    #[diagnostic(code(pipim::venv::create))]
    VenvCreation { path: PathBuf },

    #[error("{} is not inside the virtual environment", .0.display())]
    #[diagnostic(
        code(pipim::run::outside_venv),
        help("`pipim run` only starts executables from the environment's bin directory")
    )]
    OutsideVenv(PathBuf),

    #[error("Command failed: {command}")]
    #[diagnostic(code(pipim::process::failed))]
    CommandFailed { command: String },

    #[error("Could not run {command}: {source}")]
    #[diagnostic(code(pipim::process::exec))]
    ExecFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(pipim::io))]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = PipimError> = std::result::Result<T, E>;
