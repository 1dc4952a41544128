//! Review input: a single snippet or an already-filtered project upload.

use serde::{Deserialize, Serialize};

use super::ReviewMode;

/// One file of a project upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Repo-relative, `/`-separated path.
    pub path: String,
    pub content: String,
}

impl ProjectFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// What the user asked to have reviewed.
///
/// `language` is an opaque identifier passed through to the prompt
/// verbatim; it is never checked against the supported-language table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewInput {
    Snippet { code: String, language: String },
    Project { files: Vec<ProjectFile>, language: String },
}

impl ReviewInput {
    pub fn snippet(code: impl Into<String>, language: impl Into<String>) -> Self {
        ReviewInput::Snippet {
            code: code.into(),
            language: language.into(),
        }
    }

    pub fn project(files: Vec<ProjectFile>, language: impl Into<String>) -> Self {
        ReviewInput::Project {
            files,
            language: language.into(),
        }
    }

    pub fn mode(&self) -> ReviewMode {
        match self {
            ReviewInput::Snippet { .. } => ReviewMode::Snippet,
            ReviewInput::Project { .. } => ReviewMode::Project,
        }
    }

    pub fn language(&self) -> &str {
        match self {
            ReviewInput::Snippet { language, .. } | ReviewInput::Project { language, .. } => {
                language
            }
        }
    }

    /// Number of files under review (a snippet counts as one).
    pub fn file_count(&self) -> usize {
        match self {
            ReviewInput::Snippet { .. } => 1,
            ReviewInput::Project { files, .. } => files.len(),
        }
    }

    /// Check the submission precondition.
    ///
    /// Returns the user-facing message when there is nothing to review:
    /// a snippet that is blank after trimming, or a project with no files.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            ReviewInput::Snippet { code, .. } if code.trim().is_empty() => {
                Err("Please enter some code to review.")
            }
            ReviewInput::Project { files, .. } if files.is_empty() => {
                Err("Please upload a project to review.")
            }
            _ => Ok(()),
        }
    }
}
