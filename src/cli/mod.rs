//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Send GoodLinks highlights to Readwise
#[derive(Parser, Debug)]
#[command(name = "glr", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print the payload that would be posted instead of posting it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// GoodLinks database path (default: the GoodLinks group container)
    #[arg(long, global = true, env = "GOODLINKS_DB")]
    pub db: Option<PathBuf>,

    /// Only sync highlights made after this time (RFC 3339 or YYYY-MM-DD)
    #[arg(long, global = true)]
    pub since: Option<String>,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync highlights to Readwise (the default when no command is given)
    Sync,

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
