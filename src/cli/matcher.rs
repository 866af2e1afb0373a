//! Argument matcher
//!
//! pipim only understands a handful of words. Everything else belongs to pip,
//! so instead of a grammar this is a single scan against a lookup table.

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};

/// A command or flag pipim recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Switch {
    Help,
    User,
    Install,
    Update,
    Uninstall,
    Run,
    ReplacePip,
}

impl Switch {
    /// Switches after which the remaining arguments are taken verbatim
    pub fn stops_scan(self) -> bool {
        matches!(self, Switch::Run | Switch::Update)
    }
}

/// Token to switch lookup table
const RULES: &[(&str, Switch)] = &[
    ("help", Switch::Help),
    ("-h", Switch::Help),
    ("--help", Switch::Help),
    ("-u", Switch::User),
    ("--user", Switch::User),
    ("install", Switch::Install),
    ("i", Switch::Install),
    ("in", Switch::Install),
    ("update", Switch::Update),
    ("up", Switch::Update),
    ("uninstall", Switch::Uninstall),
    ("u", Switch::Uninstall),
    ("un", Switch::Uninstall),
    ("remove", Switch::Uninstall),
    ("run", Switch::Run),
    ("r", Switch::Run),
    ("replace-pip", Switch::ReplacePip),
];

fn lookup(token: &OsStr) -> Option<Switch> {
    let token = token.to_str()?;
    RULES
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, switch)| *switch)
}

/// Result of matching the raw argument list
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchedArgs {
    switches: BTreeSet<Switch>,
    /// Arguments pipim did not recognize, in order and byte-for-byte
    pub arguments: Vec<OsString>,
}

impl MatchedArgs {
    pub fn has(&self, switch: Switch) -> bool {
        self.switches.contains(&switch)
    }

    pub fn set(&mut self, switch: Switch) {
        self.switches.insert(switch);
    }
}

/// Match raw arguments (without the program name)
///
/// Hitting a stop switch ends the scan: the arguments become exactly the
/// tokens after it, and anything unrecognized before it is dropped.
pub fn match_args<I, S>(raw: I) -> MatchedArgs
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut matched = MatchedArgs::default();
    let mut tokens = raw.into_iter().map(Into::into);

    while let Some(token) = tokens.next() {
        match lookup(&token) {
            Some(switch) => {
                matched.set(switch);
                if switch.stops_scan() {
                    matched.arguments = tokens.collect();
                    break;
                }
            }
            None => matched.arguments.push(token),
        }
    }

    tracing::debug!(switches = ?matched.switches, arguments = ?matched.arguments, "matched");
    matched
}
