//! The `replace-pip` shim: a `pip` on PATH that forwards to pipim

use std::path::{Path, PathBuf};

use crate::core::error::{PipimError, Result};

pub const SHIM_SCRIPT: &str = "#!/bin/sh\n\nexec pipim \"$@\"\n";

/// Default shim location, `~/.local/bin/pip`
pub fn default_target() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".local").join("bin").join("pip"))
        .ok_or(PipimError::HomeNotFound)
}

/// Write the shim to `target`, refusing to overwrite anything
pub fn install(target: &Path) -> Result<()> {
    if target.exists() {
        return Err(PipimError::ShimExists(target.to_path_buf()));
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, SHIM_SCRIPT)?;
    make_executable(target)?;

    tracing::debug!(path = %target.display(), "wrote shim");
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
