//! Logging setup using the `tracing` ecosystem.
//!
//! # Example
//!
//! ```rust,no_run
//! use esmbit_dev::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("Serving www-root");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "esmbit_dev=debug,esmbit_cms=debug,tower_http=debug";
const QUIET_FILTER: &str = "esmbit_dev=error,esmbit_cms=error";
const DEFAULT_FILTER: &str = "esmbit_dev=info,esmbit_cms=info";

/// Initialize the tracing subscriber.
///
/// Must be called once, before any logging occurs. The filter is chosen in
/// this order:
/// 1. `--verbose`: debug for the esmbit crates and tower-http
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info for the esmbit crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(select_filter(verbose, quiet), no_color);
}

/// Initialize logger with a custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn select_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so these
    // only exercise filter construction.

    #[test]
    fn test_verbose_filter() {
        let filter = select_filter(true, false).to_string();
        assert!(filter.contains("esmbit_dev=debug"));
        assert!(filter.contains("esmbit_cms=debug"));
        assert!(filter.contains("tower_http=debug"));
    }

    #[test]
    fn test_verbose_wins_over_quiet() {
        let filter = select_filter(true, true).to_string();
        assert!(filter.contains("esmbit_dev=debug"));
        assert!(!filter.contains("=error"));
    }

    #[test]
    fn test_quiet_filter() {
        let filter = select_filter(false, true).to_string();
        assert!(filter.contains("esmbit_dev=error"));
        assert!(filter.contains("esmbit_cms=error"));
        assert!(!filter.contains("tower_http"));
    }

    #[test]
    fn test_default_filter() {
        let filter = EnvFilter::new(DEFAULT_FILTER).to_string();
        assert!(filter.contains("esmbit_dev=info"));
        assert!(filter.contains("esmbit_cms=info"));
    }
}
