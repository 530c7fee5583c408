//! Error types for metadata loading, route resolution and `cms://` expansion.
//!
//! Metadata errors are fatal configuration errors: the server refuses to start.
//! Route and expansion errors are request-time errors that the HTTP layer logs
//! before falling through to static serving.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading `app.metadata.json`.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Metadata file could not be read
    #[error("Failed to read app metadata {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata file is not a JSON array of app descriptors
    #[error("Invalid app metadata {}: {source}\n\nHint: The file must be a JSON array of {{ route, title, module }} objects", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An app has no route, or a route that is not absolute
    #[error("App '{title}' has invalid route '{route}'\n\nHint: Routes must be non-empty and start with '/'")]
    InvalidRoute { title: String, route: String },

    /// A redirect source is neither a regex (`^...`) nor an absolute path
    #[error("Invalid redirect source '{pattern}' for route '{route}'\n\nHint: Use '^...' for a regular expression or '/...' for an exact path")]
    InvalidPattern { route: String, pattern: String },

    /// A `^...` redirect source does not compile
    #[error("Invalid redirect regex '{pattern}' for route '{route}': {source}")]
    InvalidRegex {
        route: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while resolving a request path against the route table.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Rewrite chain exceeded the depth bound
    #[error("Rewrite depth {depth} exceeded the limit of {limit}:\n - {}", .chain.join("\n - "))]
    DepthExceeded {
        depth: usize,
        limit: usize,
        chain: Vec<String>,
    },
}

/// Errors raised while expanding `{{ cms://... }}` references.
#[derive(Debug, Error)]
pub enum ExpandError {
    /// A file includes itself, directly or through other files
    #[error("Recursive reference expanding CMS content:\n - {}", format_chain(.chain))]
    Cycle { chain: Vec<PathBuf> },

    /// A referenced file exists but could not be read
    #[error("Failed to read CMS file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n - ")
}
