//! Command-line interface definition.
//!
//! - `esmbit-dev serve` - run the development server with live reload
//! - `esmbit-dev check` - validate configuration and app metadata

mod commands;
mod tests;

use clap::Parser;

pub use commands::{CheckArgs, Command, ConfigArgs, ServeArgs};

/// esmbit-dev - development server for esmbit widget builds
#[derive(Parser, Debug)]
#[command(
    name = "esmbit-dev",
    version,
    about = "Development server for esmbit widget builds",
    long_about = "Serves built widgets from a content root, expands cms:// references,\n\
                  routes app pages from app.metadata.json and pushes live-reload\n\
                  notifications when build output changes."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
