//! CLI module - argument matching and command dispatch

pub mod args;
pub mod commands;
pub mod log;
pub mod matcher;

pub use args::Cli;
pub use log::Log;
pub use matcher::{match_args, MatchedArgs, Switch};
