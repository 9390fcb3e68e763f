//! glr entry point.

use clap::Parser;
use glr::cli::commands;
use glr::cli::commands::sync::SyncArgs;
use glr::cli::{Cli, Commands};
use glr::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet, cli.json);

    // Errors are always reported; --quiet only silences the run report
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if let Some(hint) = e.hint() {
                eprintln!("Error: {e}\n  Hint: {hint}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool, json: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            // stderr carries only the JSON error object
            0 if json => EnvFilter::new("off"),
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info,hyper_util=info,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        None | Some(Commands::Sync) => commands::sync::execute(&SyncArgs {
            dry_run: cli.dry_run,
            db: cli.db.as_ref(),
            since: cli.since.as_deref(),
            json: cli.json,
            quiet: cli.quiet,
        }),
        Some(Commands::Version) => commands::version::execute(cli.json),
        Some(Commands::Completions { shell }) => commands::completions::execute(shell),
    }
}
