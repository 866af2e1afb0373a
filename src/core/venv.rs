//! Virtual environment location and on-demand creation

use std::path::{Path, PathBuf};

use crate::core::error::{PipimError, Result};
use crate::core::process::Invocation;

/// Scratch environment used by `pipim update`
pub const UPDATE_VENV: &str = ".update";

/// An isolated Python environment, identified only by its directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venv {
    root: PathBuf,
}

impl Venv {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    /// Directory holding the environment's executables
    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.root.join("Scripts")
        } else {
            self.root.join("bin")
        }
    }

    /// Invocation of an executable inside this environment
    pub fn tool(&self, name: impl AsRef<Path>) -> Invocation {
        Invocation::in_dir(&self.bin_dir(), name)
    }

    pub fn pip(&self) -> Invocation {
        self.tool("pip")
    }

    /// Command that creates this environment with pip included
    pub fn create_command(&self, python: &str) -> Invocation {
        Invocation::new(python)
            .args(["-m", "venv"])
            .arg(self.root.as_os_str())
    }

    /// Create the environment unless its directory already exists
    ///
    /// Returns whether anything was created.
    pub fn ensure(&self, python: &str) -> Result<bool> {
        if self.exists() {
            tracing::debug!(path = %self.root.display(), "environment present");
            return Ok(false);
        }

        let cmd = self.create_command(python);
        tracing::debug!(command = %cmd, "creating environment");
        cmd.capture().map_err(|e| match e {
            PipimError::CommandFailed { .. } => PipimError::VenvCreation {
                path: self.root.clone(),
            },
            other => other,
        })?;
        Ok(true)
    }

    /// Delete the environment directory
    pub fn remove(&self) -> Result<()> {
        std::fs::remove_dir_all(&self.root)?;
        Ok(())
    }
}
