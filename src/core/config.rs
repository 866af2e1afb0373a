//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the per-project config file, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "pipim.yaml";

/// pipim configuration with layered hierarchy
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Interpreter used to create environments and for `--user` fallback
    pub python: Option<String>,

    /// Location of the project environment
    pub venv_dir: Option<PathBuf>,

    /// Tool preferred over pip in `--user` mode when it is on PATH
    pub user_tool: Option<String>,

    /// Suppress `pipim:` status lines
    pub quiet: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults live in the accessors

        // 2. Global user config (~/.config/pipim/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (./pipim.yaml)
        if let Some(project) = Self::read_file(Path::new(PROJECT_CONFIG_FILE)) {
            config.merge(project);
        }

        // 4. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pipim")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Parse a config file, ignoring it (with a warning) if it is unusable
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                None
            }
        }
    }

    /// Build the environment layer from a variable lookup
    fn from_env(var: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            python: var("PIPIM_PYTHON").filter(|v| !v.is_empty()),
            venv_dir: var("PIPIM_VENV")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            user_tool: var("PIPIM_USER_TOOL").filter(|v| !v.is_empty()),
            quiet: var("PIPIM_QUIET").map(|v| matches!(v.as_str(), "1" | "true" | "yes")),
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.python.is_some() {
            self.python = other.python;
        }
        if other.venv_dir.is_some() {
            self.venv_dir = other.venv_dir;
        }
        if other.user_tool.is_some() {
            self.user_tool = other.user_tool;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
    }

    /// Get the Python interpreter command
    pub fn python(&self) -> &str {
        self.python.as_deref().unwrap_or(if cfg!(windows) {
            "python"
        } else {
            "python3"
        })
    }

    /// Get the project environment directory
    pub fn venv_dir(&self) -> &Path {
        self.venv_dir.as_deref().unwrap_or(Path::new(".venv"))
    }

    /// Get the user-mode tool name
    pub fn user_tool(&self) -> &str {
        self.user_tool.as_deref().unwrap_or("pipus")
    }

    pub fn quiet(&self) -> bool {
        self.quiet.unwrap_or(false)
    }
}
