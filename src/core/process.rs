//! External command abstraction layer
//!
//! Every program pipim starts goes through [`Invocation`]. Arguments are
//! passed via std::process::Command args, never through a shell.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::core::error::{PipimError, Result};

/// A program plus its argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Invocation of an executable inside an environment's bin directory
    pub fn in_dir(dir: &Path, program: impl AsRef<Path>) -> Self {
        Self::new(dir.join(program))
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Run to completion with stdout captured, failing on a non-zero status
    pub fn capture(&self) -> Result<String> {
        tracing::debug!(command = %self, "capturing");
        let output = self
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| PipimError::ExecFailed {
                command: self.to_string(),
                source,
            })?;

        if !output.status.success() {
            tracing::debug!(command = %self, code = ?output.status.code(), "command failed");
            return Err(PipimError::CommandFailed {
                command: self.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Replace the current process with this invocation
    ///
    /// Only returns if the program could not be started.
    #[cfg(unix)]
    pub fn exec(&self) -> PipimError {
        use std::os::unix::process::CommandExt;

        tracing::debug!(command = %self, "exec");
        let source = self.command().exec();
        PipimError::ExecFailed {
            command: self.to_string(),
            source,
        }
    }

    /// Run this invocation and exit with its status code
    ///
    /// Only returns if the program could not be started.
    #[cfg(not(unix))]
    pub fn exec(&self) -> PipimError {
        tracing::debug!(command = %self, "spawn and wait");
        match self.command().status() {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(source) => PipimError::ExecFailed {
                command: self.to_string(),
                source,
            },
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
