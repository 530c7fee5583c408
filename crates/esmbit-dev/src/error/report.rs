//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use esmbit_cms::MetadataError;
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Metadata(e) => metadata_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

fn metadata_error_to_miette(err: MetadataError) -> Report {
    match err {
        MetadataError::InvalidRegex {
            route,
            pattern,
            source,
        } => miette::miette!(
            "Invalid redirect regex '{}' for route '{}'\n\n{}",
            pattern,
            route,
            source
        ),
        other => miette::miette!("Failed to load app metadata: {}", other),
    }
}
