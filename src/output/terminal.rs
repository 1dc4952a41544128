//! Terminal renderer: the Markdown review with light ANSI styling.
//!
//! Headings are bold, fenced code is tinted. Text is never rewritten, so
//! stripping the colour codes gives back the review verbatim.

use colored::Colorize;

use crate::models::ReviewMode;
use crate::output::{ReviewRenderer, ReviewReport};

/// Terminal output renderer.
pub struct TerminalRenderer;

impl ReviewRenderer for TerminalRenderer {
    fn render(&self, report: &ReviewReport) -> String {
        let mut output = String::new();

        let subject = match report.mode {
            ReviewMode::Snippet => format!("{} snippet", report.language),
            ReviewMode::Project => format!(
                "{} project, {} file{}",
                report.language,
                report.file_count,
                if report.file_count == 1 { "" } else { "s" }
            ),
        };
        output.push_str(&format!(
            " {} {} {}\n\n",
            "▸".cyan().bold(),
            format!("Review by {}", report.provider.display_name()).bold(),
            format!("({subject})").dimmed(),
        ));

        let mut in_fence = false;
        for line in report.review.lines() {
            let trimmed = line.trim_start();
            let styled = if trimmed.starts_with("```") {
                in_fence = !in_fence;
                line.dimmed().to_string()
            } else if in_fence {
                line.yellow().to_string()
            } else if trimmed.starts_with('#') {
                line.cyan().bold().to_string()
            } else {
                line.to_string()
            };
            output.push_str(&styled);
            output.push('\n');
        }

        output.push_str(&format!("\n{}\n", "───────────────────────────────────".dimmed()));
        output.push_str(&format!(" {}\n", crate::constants::AI_DISCLOSURE.dimmed()));
        output
    }
}
