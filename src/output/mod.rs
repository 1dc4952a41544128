//! Output renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use serde::Serialize;

use crate::models::{ProviderId, ReviewInput, ReviewMode};

/// A finished review plus what produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewReport {
    pub provider: ProviderId,
    pub mode: ReviewMode,
    pub language: String,
    pub file_count: usize,
    /// Markdown review text, exactly as the provider returned it.
    pub review: String,
}

impl ReviewReport {
    pub fn new(input: &ReviewInput, provider: ProviderId, review: String) -> Self {
        Self {
            provider,
            mode: input.mode(),
            language: input.language().to_string(),
            file_count: input.file_count(),
            review,
        }
    }
}

/// Trait for rendering a review to an output format.
pub trait ReviewRenderer {
    fn render(&self, report: &ReviewReport) -> String;
}
