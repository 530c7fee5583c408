//! Status message functions for terminal output.

use owo_colors::{OwoColorize, Stream::Stderr, Style};

/// Print a success message to stderr.
///
/// ```no_run
/// use esmbit_dev::ui::success;
///
/// success("Development server stopped");
/// ```
pub fn success(message: &str) {
    eprintln!("{}", success_line(message));
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!("{}", info_line(message));
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    eprintln!("{}", warning_line(message));
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    eprintln!("{}", error_line(message));
}

fn success_line(message: &str) -> String {
    let mark = "✓".if_supports_color(Stderr, |t| t.style(Style::new().green().bold()));
    format!("{} {}", mark, message)
}

fn info_line(message: &str) -> String {
    let mark = "ℹ".if_supports_color(Stderr, |t| t.style(Style::new().blue().bold()));
    format!("{} {}", mark, message)
}

fn warning_line(message: &str) -> String {
    let mark = "⚠".if_supports_color(Stderr, |t| t.style(Style::new().yellow().bold()));
    format!("{} {}", mark, message.if_supports_color(Stderr, |t| t.yellow()))
}

fn error_line(message: &str) -> String {
    let mark = "✗".if_supports_color(Stderr, |t| t.style(Style::new().red().bold()));
    format!("{} {}", mark, message.if_supports_color(Stderr, |t| t.red()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_plain_status_lines() {
        owo_colors::set_override(false);
        assert_eq!(success_line("Server stopped"), "✓ Server stopped");
        assert_eq!(info_line("Watching dist"), "ℹ Watching dist");
        assert_eq!(warning_line("No build dir"), "⚠ No build dir");
        assert_eq!(error_line("Bind failed"), "✗ Bind failed");
        owo_colors::unset_override();
    }

    #[test]
    #[serial]
    fn test_colored_status_lines() {
        owo_colors::set_override(true);
        let line = error_line("Bind failed");
        owo_colors::unset_override();

        assert!(line.contains("\u{1b}["));
        assert!(line.contains("Bind failed"));
        assert_ne!(line, "✗ Bind failed");
    }
}
