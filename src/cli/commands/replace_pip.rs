//! `pipim replace-pip` - put a pip shim on PATH that runs pipim

use miette::Result;

use crate::cli::log::Log;
use crate::core::shim;

pub fn run(log: &Log) -> Result<()> {
    let target = shim::default_target()?;
    shim::install(&target)?;
    log.note(format_args!(
        "Created {}, you may need to refresh your environment",
        target.display()
    ));
    Ok(())
}
