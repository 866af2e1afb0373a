//! pipim: pip improved
//!
//! Runs pip inside a project-local virtual environment, creating the
//! environment first when it is missing.

pub mod cli;
pub mod core;
