use clap::{Args, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the development server
    ///
    /// Serves the content root over HTTP, expanding cms:// references in
    /// .html, .css and .js files, and pushes live-reload messages over a
    /// WebSocket when the build output changes.
    Serve(ServeArgs),

    /// Validate configuration and app metadata
    ///
    /// Loads esmbit.config.json and app.metadata.json exactly as `serve`
    /// would and prints the resulting route table.
    Check(CheckArgs),
}

/// Options shared by every command that loads configuration
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Content root to serve (overrides `web_root` in the config file)
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Path to the config file (defaults to ./esmbit.config.json if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the serve command
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// HTTP port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// WebSocket port for live-reload notifications
    #[arg(long, value_name = "PORT")]
    pub ws_port: Option<u16>,

    /// Interface to bind
    #[arg(long, value_name = "ADDR")]
    pub host: Option<IpAddr>,

    /// Disable watching the build output and live reload
    #[arg(long)]
    pub no_watch: bool,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}
