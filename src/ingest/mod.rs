//! Project upload: turn a folder on disk into the ordered file list a
//! project review takes.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::config::UploadFilterRules;
use crate::models::ProjectFile;

/// Errors from project ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("path not found: {0}")]
    NotFound(String),

    #[error("failed to walk {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl UploadFilterRules {
    /// Whether a file with this name is kept.
    pub fn accepts_file(&self, name: &str) -> bool {
        !self.ignored_files.iter().any(|ignored| ignored == name)
            && self
                .allowed_extensions
                .iter()
                .any(|suffix| !suffix.is_empty() && name.ends_with(suffix.as_str()))
    }

    /// Whether a directory with this name is descended.
    pub fn accepts_dir(&self, name: &str) -> bool {
        !self.ignored_dirs.iter().any(|ignored| ignored == name)
    }
}

/// Collect the reviewable files under `root`, in file-name order.
///
/// Paths are relative to the parent of `root`, so they start with the
/// folder's own name, and always use `/`. Unreadable and non-UTF-8 files
/// are skipped.
pub async fn collect_project_files(
    root: &Path,
    rules: &UploadFilterRules,
) -> Result<Vec<ProjectFile>, IngestError> {
    if !root.exists() {
        return Err(IngestError::NotFound(root.display().to_string()));
    }
    let root = std::fs::canonicalize(root).map_err(|e| IngestError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;
    let base = root.parent().unwrap_or(&root).to_path_buf();

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored_dir(entry, rules));

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !rules.accepts_file(name) {
            continue;
        }

        let content = match tokio::fs::read_to_string(entry.path()).await {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "skipping file");
                continue;
            }
        };
        files.push(ProjectFile::new(relative_path(entry.path(), &base), content));
    }

    tracing::debug!(root = %root.display(), count = files.len(), "collected project files");
    Ok(files)
}

fn is_ignored_dir(entry: &DirEntry, rules: &UploadFilterRules) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| !rules.accepts_dir(name))
}

fn relative_path(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
