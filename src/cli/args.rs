//! CLI argument definitions using clap derive
//!
//! clap only collects the raw argument vector here; the words pipim
//! understands are picked out by [`crate::cli::matcher`] so that everything
//! else, flags included, reaches pip untouched.

use clap::Parser;
use std::ffi::OsString;

use crate::cli::matcher::{match_args, MatchedArgs};

#[derive(Parser, Debug)]
#[command(name = "pipim")]
#[command(about = "pip improved")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Command and arguments; anything pipim does not recognize goes to pip
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..,
        value_parser = clap::value_parser!(OsString)
    )]
    pub args: Vec<OsString>,
}

impl Cli {
    /// Parse the process arguments
    pub fn parse_raw() -> Self {
        Self::parse_from(Self::separated(std::env::args_os()))
    }

    /// Parse an argument vector whose first item is the program name
    pub fn try_parse_raw<I, T>(raw: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(Self::separated(raw))
    }

    /// Put `--` right after the program name so clap never interprets a
    /// user token (a leading `--` included) as its own
    fn separated<I, T>(raw: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut raw = raw.into_iter().map(Into::into);
        let program = raw.next().unwrap_or_else(|| OsString::from("pipim"));
        [program, OsString::from("--")].into_iter().chain(raw).collect()
    }

    pub fn matched(&self) -> MatchedArgs {
        match_args(self.args.iter().cloned())
    }
}

pub const HELP: &str = "\
pipim: pip improved


pipim will create a virtual environment in the current directory if one doesn't
already exist, and run pip inside it, unless the --user flag is passed.


Usage:
    pipim [command] [arguments...]


The default command is install if none is specified.


Commands:
    install, i, in:        Install packages in a virtual environment
                           If no packages are provided, installs from
                           requirements.txt instead

    uninstall, un, remove: Uninstall packages from a virtual environment

    run, r:                Run a command in a virtual environment
                           Everything after the run command is passed to the
                           command

    update, up:            Read dependencies from a file called
                           requirements.update.txt or anything passed as an
                           argument, update them to the latest version, then
                           write the frozen requirements to requirements.txt

    replace-pip:           Writes a script to ~/.local/bin/pip that runs pipim
                           instead of pip

    help                   Show this help message

Flags:
    -h, --help:            Show this help message
    -u, --user:            Work with the user's packages instead of a virtual
                           environment. pipus will be used if available.


Any other flags or arguments will be passed down to pip.
";
