//! Command selection and execution
//!
//! [`plan`] turns matched arguments into a [`Plan`] without touching
//! anything; [`run`] carries it out.

pub mod replace_pip;
pub mod update;

use miette::Result;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::cli::args::HELP;
use crate::cli::log::Log;
use crate::cli::matcher::{MatchedArgs, Switch};
use crate::core::error::PipimError;
use crate::core::{Config, Invocation, Venv};

/// Requirements file read by `install` and written by `update`
pub const REQUIREMENTS: &str = "requirements.txt";

/// Default input of `update`
pub const UPDATE_REQUIREMENTS: &str = "requirements.update.txt";

/// What pipim is going to do
#[derive(Debug, PartialEq, Eq)]
pub enum Plan {
    Help,
    ReplacePip,
    Update { file: PathBuf },
    Delegate(Delegation),
}

/// Hand the process over to another program
#[derive(Debug, PartialEq, Eq)]
pub struct Delegation {
    pub invocation: Invocation,
    /// Environment to create first, if missing
    pub venv: Option<Venv>,
    pub notice: Option<String>,
}

impl Delegation {
    fn in_venv(venv: &Venv, invocation: Invocation) -> Self {
        Self {
            invocation,
            venv: Some(venv.clone()),
            notice: None,
        }
    }
}

/// The parts of the outside world [`plan`] looks at
pub trait Host {
    fn exists(&self, path: &Path) -> bool;
    fn on_path(&self, program: &str) -> bool;
    /// Whether a virtualenv is activated in the calling shell
    fn in_virtualenv(&self) -> bool;
}

/// Host backed by the real filesystem and PATH
pub struct System;

impl Host for System {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn on_path(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn in_virtualenv(&self) -> bool {
        std::env::var_os("VIRTUAL_ENV").is_some_and(|v| !v.is_empty())
    }
}

/// Decide what to do with the matched arguments
pub fn plan(
    args: &MatchedArgs,
    config: &Config,
    host: &impl Host,
) -> Result<Plan, PipimError> {
    if args.has(Switch::Help) {
        return Ok(Plan::Help);
    }

    if args.has(Switch::ReplacePip) {
        return Ok(Plan::ReplacePip);
    }

    if args.has(Switch::User) {
        return Ok(Plan::Delegate(plan_user(args, config, host)));
    }

    let venv = Venv::new(config.venv_dir());

    if args.has(Switch::Run) {
        let (program, rest) = match args.arguments.split_first() {
            Some((program, rest)) => (program.as_os_str(), rest),
            None => (OsStr::new("python"), &[][..]),
        };
        if Path::new(program).is_absolute() {
            return Err(PipimError::OutsideVenv(PathBuf::from(program)));
        }
        let invocation = venv.tool(program).args(rest);
        return Ok(Plan::Delegate(Delegation::in_venv(&venv, invocation)));
    }

    if args.has(Switch::Uninstall) {
        let invocation = venv.pip().arg("uninstall").args(&args.arguments);
        return Ok(Plan::Delegate(Delegation::in_venv(&venv, invocation)));
    }

    if args.has(Switch::Update) {
        let file = match args.arguments.as_slice() {
            [] => PathBuf::from(UPDATE_REQUIREMENTS),
            [file] => PathBuf::from(file),
            _ => return Err(PipimError::UpdateArity),
        };
        if !host.exists(&file) {
            return Err(PipimError::FileNotFound(file));
        }
        return Ok(Plan::Update { file });
    }

    if args.arguments.is_empty() {
        if !host.exists(Path::new(REQUIREMENTS)) {
            return Err(PipimError::NoRequirements);
        }
        let invocation = venv.pip().args(["install", "-r", REQUIREMENTS]);
        return Ok(Plan::Delegate(Delegation::in_venv(&venv, invocation)));
    }

    let invocation = if args.has(Switch::Install) {
        venv.pip().arg("install").args(&args.arguments)
    } else {
        venv.pip().args(&args.arguments)
    };
    Ok(Plan::Delegate(Delegation::in_venv(&venv, invocation)))
}

/// `--user`: the user tool if available, otherwise the interpreter's pip
fn plan_user(args: &MatchedArgs, config: &Config, host: &impl Host) -> Delegation {
    let tool = config.user_tool();
    if host.on_path(tool) {
        let mut invocation = Invocation::new(tool);
        if args.has(Switch::Uninstall) {
            invocation = invocation.arg("-R");
        }
        return Delegation {
            invocation: invocation.args(&args.arguments),
            venv: None,
            notice: Some(format!("{tool} found, using it instead of pip")),
        };
    }

    // pip refuses --user inside an activated virtualenv
    let mut invocation = Invocation::new(config.python()).args(["-m", "pip"]);
    if args.has(Switch::Install) {
        invocation = invocation.arg("install");
        if !host.in_virtualenv() {
            invocation = invocation.arg("--user");
        }
    } else if args.has(Switch::Uninstall) {
        invocation = invocation.arg("uninstall");
    }
    Delegation {
        invocation: invocation.args(&args.arguments),
        venv: None,
        notice: Some(format!("{tool} not found, using pip instead")),
    }
}

/// Carry out the plan for the matched arguments
///
/// Delegations replace the process and only come back on failure.
pub fn run(args: &MatchedArgs, config: &Config, log: &Log) -> Result<()> {
    let plan = plan(args, config, &System)?;
    tracing::debug!(?plan, "planned");

    match plan {
        Plan::Help => {
            println!("{HELP}");
            Ok(())
        }
        Plan::ReplacePip => replace_pip::run(log),
        Plan::Update { file } => update::run(&file, config, log),
        Plan::Delegate(delegation) => delegate(delegation, config, log),
    }
}

fn delegate(delegation: Delegation, config: &Config, log: &Log) -> Result<()> {
    if let Some(notice) = &delegation.notice {
        log.note(notice);
    }
    if let Some(venv) = &delegation.venv {
        ensure_venv(venv, config, log)?;
    }
    log.note(format_args!("Running {}", delegation.invocation));
    Err(delegation.invocation.exec().into())
}

/// Create `venv` if it does not exist yet, announcing it
pub(crate) fn ensure_venv(venv: &Venv, config: &Config, log: &Log) -> Result<(), PipimError> {
    if !venv.exists() {
        log.note("Creating virtual environment...");
    }
    venv.ensure(config.python())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::matcher::match_args;
    use std::collections::HashSet;

    #[derive(Default)]
    struct FakeHost {
        files: HashSet<PathBuf>,
        programs: HashSet<String>,
        virtualenv: bool,
    }

    impl FakeHost {
        fn with_file(mut self, path: &str) -> Self {
            self.files.insert(PathBuf::from(path));
            self
        }

        fn with_program(mut self, name: &str) -> Self {
            self.programs.insert(name.to_string());
            self
        }

        fn activated(mut self) -> Self {
            self.virtualenv = true;
            self
        }
    }

    impl Host for FakeHost {
        fn exists(&self, path: &Path) -> bool {
            self.files.contains(path)
        }

        fn on_path(&self, program: &str) -> bool {
            self.programs.contains(program)
        }

        fn in_virtualenv(&self) -> bool {
            self.virtualenv
        }
    }

    fn config() -> Config {
        Config {
            python: Some("python3".to_string()),
            ..Config::default()
        }
    }

    fn plan_for(raw: &[&str], host: &FakeHost) -> Result<Plan, PipimError> {
        plan(&match_args(raw.iter().copied()), &config(), host)
    }

    fn delegated(raw: &[&str], host: &FakeHost) -> Delegation {
        match plan_for(raw, host).unwrap() {
            Plan::Delegate(d) => d,
            other => panic!("expected delegation, got {other:?}"),
        }
    }

    fn command_line(raw: &[&str], host: &FakeHost) -> String {
        delegated(raw, host).invocation.to_string()
    }

    #[test]
    fn test_help_wins_over_everything() {
        let host = FakeHost::default();
        assert_eq!(plan_for(&["-u", "install", "-h"], &host).unwrap(), Plan::Help);
        assert_eq!(plan_for(&["replace-pip", "help"], &host).unwrap(), Plan::Help);
    }

    #[test]
    fn test_replace_pip() {
        let host = FakeHost::default();
        assert_eq!(plan_for(&["replace-pip", "-u"], &host).unwrap(), Plan::ReplacePip);
    }

    #[test]
    fn test_user_prefers_user_tool() {
        let host = FakeHost::default().with_program("pipus");

        let d = delegated(&["-u", "install", "black"], &host);
        assert_eq!(d.invocation.to_string(), "pipus black");
        assert!(d.venv.is_none());
        assert_eq!(d.notice.as_deref(), Some("pipus found, using it instead of pip"));

        assert_eq!(command_line(&["--user", "remove", "black"], &host), "pipus -R black");
    }

    #[test]
    fn test_user_falls_back_to_interpreter_pip() {
        let host = FakeHost::default();

        let d = delegated(&["-u", "i", "black"], &host);
        assert_eq!(d.invocation.to_string(), "python3 -m pip install --user black");
        assert!(d.venv.is_none());

        assert_eq!(
            command_line(&["-u", "uninstall", "black"], &host),
            "python3 -m pip uninstall black"
        );
        assert_eq!(command_line(&["-u", "list"], &host), "python3 -m pip list");
    }

    #[test]
    fn test_user_install_inside_activated_virtualenv_skips_user_flag() {
        let host = FakeHost::default().activated();
        assert_eq!(
            command_line(&["-u", "install", "black"], &host),
            "python3 -m pip install black"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_run_uses_environment_executables() {
        let host = FakeHost::default();

        let d = delegated(&["run", "pytest", "-x", "--help"], &host);
        assert_eq!(d.invocation.to_string(), ".venv/bin/pytest -x --help");
        assert_eq!(d.venv, Some(Venv::new(".venv")));

        assert_eq!(command_line(&["r"], &host), ".venv/bin/python");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_rejects_absolute_commands() {
        let host = FakeHost::default();
        let err = plan_for(&["run", "/usr/bin/env", "python"], &host).unwrap_err();
        assert!(matches!(err, PipimError::OutsideVenv(_)));
        assert_eq!(
            err.to_string(),
            "/usr/bin/env is not inside the virtual environment"
        );

        assert_eq!(
            command_line(&["run", "tools/lint"], &host),
            ".venv/bin/tools/lint"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_uninstall_targets_environment() {
        let host = FakeHost::default();
        assert_eq!(
            command_line(&["un", "requests", "-y"], &host),
            ".venv/bin/pip uninstall requests -y"
        );
    }

    #[test]
    fn test_update_defaults_to_update_requirements() {
        let host = FakeHost::default().with_file(UPDATE_REQUIREMENTS);
        assert_eq!(
            plan_for(&["update"], &host).unwrap(),
            Plan::Update {
                file: PathBuf::from(UPDATE_REQUIREMENTS)
            }
        );
    }

    #[test]
    fn test_update_with_explicit_file() {
        let host = FakeHost::default().with_file("deps.in");
        assert_eq!(
            plan_for(&["up", "deps.in"], &host).unwrap(),
            Plan::Update {
                file: PathBuf::from("deps.in")
            }
        );
    }

    #[test]
    fn test_update_errors() {
        let host = FakeHost::default().with_file("a").with_file("b");
        assert!(matches!(
            plan_for(&["update", "a", "b"], &host),
            Err(PipimError::UpdateArity)
        ));

        let err = plan_for(&["update", "missing.txt"], &host).unwrap_err();
        assert_eq!(err.to_string(), "File missing.txt not found");
    }

    #[cfg(unix)]
    #[test]
    fn test_bare_invocation_installs_requirements() {
        let host = FakeHost::default().with_file(REQUIREMENTS);
        assert_eq!(
            command_line(&[], &host),
            ".venv/bin/pip install -r requirements.txt"
        );
        assert_eq!(
            command_line(&["install"], &host),
            ".venv/bin/pip install -r requirements.txt"
        );
    }

    #[test]
    fn test_bare_invocation_without_requirements() {
        let host = FakeHost::default();
        assert!(matches!(
            plan_for(&["install"], &host),
            Err(PipimError::NoRequirements)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_install_packages() {
        let host = FakeHost::default();
        assert_eq!(
            command_line(&["in", "requests", "flask"], &host),
            ".venv/bin/pip install requests flask"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_other_arguments_pass_through() {
        let host = FakeHost::default();
        assert_eq!(command_line(&["freeze"], &host), ".venv/bin/pip freeze");
        assert_eq!(
            command_line(&["--version"], &host),
            ".venv/bin/pip --version"
        );
        assert_eq!(command_line(&["--", "x"], &host), ".venv/bin/pip -- x");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_arguments_reach_pip_unchanged() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let odd = OsString::from_vec(b"f\xffo".to_vec());
        let args = match_args([OsString::from("install"), odd.clone()]);
        let Plan::Delegate(d) = plan(&args, &config(), &FakeHost::default()).unwrap() else {
            panic!("expected delegation");
        };
        assert_eq!(d.invocation.args, [OsString::from("install"), odd]);
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_venv_dir() {
        let host = FakeHost::default();
        let config = Config {
            venv_dir: Some(PathBuf::from("env")),
            ..config()
        };
        let Plan::Delegate(d) = plan(&match_args(["list"]), &config, &host).unwrap() else {
            panic!("expected delegation");
        };
        assert_eq!(d.invocation.to_string(), "env/bin/pip list");
        assert_eq!(d.venv, Some(Venv::new("env")));
    }
}
