//! Core module - environments, processes and configuration

pub mod config;
pub mod error;
pub mod process;
pub mod shim;
pub mod venv;

pub use config::Config;
pub use error::PipimError;
pub use process::Invocation;
pub use venv::Venv;
