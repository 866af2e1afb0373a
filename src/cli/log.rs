//! Status lines shown to the user
//!
//! These go to stderr so that output of the delegated tool (`pipim freeze`,
//! `pipim run ...`) stays clean on stdout.

use console::style;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Default)]
pub struct Log {
    quiet: bool,
}

impl Log {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print `pipim: <message>`
    pub fn note(&self, message: impl Display) {
        if self.quiet {
            return;
        }
        eprintln!("{} {}", style("pipim:").for_stderr().cyan().bold(), message);
    }
}

/// Install the tracing subscriber, filtered by `PIPIM_LOG` (off by default)
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("PIPIM_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
