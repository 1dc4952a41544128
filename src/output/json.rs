//! JSON output renderer.
//!
//! Outputs `{"provider", "mode", "language", "file_count", "review"}`.

use crate::output::{ReviewRenderer, ReviewReport};

/// JSON output renderer.
pub struct JsonRenderer;

impl ReviewRenderer for JsonRenderer {
    fn render(&self, report: &ReviewReport) -> String {
        let mut output = serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
        output.push('\n');
        output
    }
}
