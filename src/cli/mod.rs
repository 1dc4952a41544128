//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

/// Tagline with ANSI styling for clap help output.
pub const TAGLINE_STYLED: &str =
    "\x1b[1mcodecritic\x1b[0m \x1b[2m· AI code review with Gemini, Ollama or LM Studio.\x1b[0m";

/// Print the tool banner to stderr.
pub fn print_banner() {
    use colored::Colorize;
    use std::io::Write;
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = writeln!(handle);
    let _ = writeln!(
        handle,
        "  {} {}",
        codecritic::constants::APP_NAME.bold(),
        format!("{} · AI code review", codecritic::constants::VERSION).dimmed(),
    );
    let _ = writeln!(handle);
    let _ = handle.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_banner_no_panic() {
        print_banner();
    }

    #[test]
    fn tagline_styled_is_non_empty() {
        assert!(TAGLINE_STYLED.contains("codecritic"));
    }
}
