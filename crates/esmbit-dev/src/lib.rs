//! esmbit-dev - development server for esmbit widget builds.
//!
//! Serves a content root over HTTP, expands `cms://` references through
//! [`esmbit_cms`], routes app pages from `app.metadata.json` and pushes
//! live-reload messages over a WebSocket when build output changes.
//!
//! - [`error`] - error types with actionable messages
//! - [`logger`] - structured logging with tracing
//! - [`ui`] - terminal status output
//! - [`config`] - layered configuration
//! - [`dev`] - HTTP server, middleware, watcher and live reload
//! - [`commands`] - `serve` and `check`

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result, ResultExt};
