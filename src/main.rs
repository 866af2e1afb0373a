use miette::Result;
use pipim::cli::args::HELP;
use pipim::cli::{Cli, Log};
use pipim::core::{Config, PipimError};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;
    pipim::cli::log::init_tracing();

    let cli = Cli::parse_raw();
    let config = Config::load();
    let log = Log::new(config.quiet());

    if let Err(report) = pipim::cli::commands::run(&cli.matched(), &config, &log) {
        // Usage errors are followed by the help text
        eprintln!("{report:?}");
        if matches!(report.downcast_ref::<PipimError>(), Some(PipimError::UpdateArity)) {
            eprintln!("{HELP}");
        }
        std::process::exit(1);
    }
    Ok(())
}
