//! gridterm CLI - Command-line interface for the gridterm terminal host
//!
//! Provides commands for browsing the layout catalogue, managing projects,
//! switching layouts, closing and reopening panes, and running a pane's
//! shell session headlessly.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use gridterm_core::tracing::{TracingLevel, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    init_logging(&cli);

    let result = commands::dispatch(config_path, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}

/// Sets up logging from the settings file, raised by `-v` flags.
///
/// Logging problems never stop a command; they are reported and skipped.
fn init_logging(cli: &Cli) {
    let settings = util::create_config_manager(cli.config.as_deref())
        .ok()
        .and_then(|manager| manager.load_settings().ok())
        .unwrap_or_default();

    let mut config = settings.logging.tracing_config();
    // Command output goes to stdout; keep stderr quiet unless logs go to a file.
    config.level = match cli.verbose {
        0 if cli.quiet => TracingLevel::Error,
        0 if settings.logging.file.is_some() => config.level,
        0 => TracingLevel::Warn,
        1 => TracingLevel::Info,
        2 => TracingLevel::Debug,
        _ => TracingLevel::Trace,
    };

    if let Err(e) = init_tracing(&config)
        && !cli.quiet
    {
        eprintln!("Warning: logging disabled: {e}");
    }
}
