//! Supported-language table.
//!
//! Informational only: drives `codecritic languages` and extension-based
//! inference. Prompt building accepts any identifier.

use std::path::Path;

/// A language offered for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub id: &'static str,
    pub name: &'static str,
    /// Lowercase file extensions (without the dot) that imply this language.
    pub extensions: &'static [&'static str],
}

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { id: "javascript", name: "JavaScript", extensions: &["js", "jsx", "mjs", "cjs"] },
    Language { id: "typescript", name: "TypeScript", extensions: &["ts", "tsx", "mts", "cts"] },
    Language { id: "python", name: "Python", extensions: &["py"] },
    Language { id: "java", name: "Java", extensions: &["java"] },
    Language { id: "csharp", name: "C#", extensions: &["cs"] },
    Language { id: "go", name: "Go", extensions: &["go"] },
    Language { id: "rust", name: "Rust", extensions: &["rs"] },
    Language { id: "ruby", name: "Ruby", extensions: &["rb"] },
    Language { id: "php", name: "PHP", extensions: &["php"] },
    Language { id: "html", name: "HTML", extensions: &["html", "htm"] },
    Language { id: "css", name: "CSS", extensions: &["css", "scss"] },
    Language { id: "sql", name: "SQL", extensions: &["sql"] },
    Language { id: "json", name: "JSON", extensions: &["json"] },
    Language { id: "markdown", name: "Markdown", extensions: &["md", "markdown"] },
];

/// Look up a language by id (case-insensitive).
pub fn find(id: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| lang.id.eq_ignore_ascii_case(id))
}

/// Infer a language from a file's extension.
pub fn from_path(path: &Path) -> Option<&'static Language> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| lang.extensions.contains(&ext.as_str()))
}

/// The language most files in a project are written in.
///
/// Ties go to the language listed first in [`SUPPORTED_LANGUAGES`].
pub fn dominant<'a>(paths: impl IntoIterator<Item = &'a str>) -> Option<&'static Language> {
    let mut counts = vec![0usize; SUPPORTED_LANGUAGES.len()];
    for path in paths {
        if let Some(lang) = from_path(Path::new(path)) {
            if let Some(idx) = SUPPORTED_LANGUAGES.iter().position(|l| l.id == lang.id) {
                counts[idx] += 1;
            }
        }
    }
    let (idx, &count) = counts
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))?;
    (count > 0).then(|| &SUPPORTED_LANGUAGES[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_unique_ids() {
        let mut ids: Vec<_> = SUPPORTED_LANGUAGES.iter().map(|l| l.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), SUPPORTED_LANGUAGES.len());
    }

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(find("TypeScript").map(|l| l.name), Some("TypeScript"));
        assert!(find("cobol").is_none());
    }

    #[test]
    fn infers_from_extension() {
        assert_eq!(from_path(Path::new("src/lib.rs")).map(|l| l.id), Some("rust"));
        assert_eq!(from_path(Path::new("App.TSX")).map(|l| l.id), Some("typescript"));
        assert_eq!(from_path(Path::new("styles/site.scss")).map(|l| l.id), Some("css"));
        assert!(from_path(Path::new("Makefile")).is_none());
        assert!(from_path(Path::new("notes.txt")).is_none());
    }

    #[test]
    fn dominant_counts_files() {
        let paths = ["app/a.py", "app/b.py", "app/index.html", "app/README.md"];
        assert_eq!(dominant(paths).map(|l| l.id), Some("python"));
        assert_eq!(dominant(["x/Dockerfile", "x/run.sh"]), None);
    }

    #[test]
    fn dominant_ties_follow_table_order() {
        assert_eq!(dominant(["a.ts", "b.js"]).map(|l| l.id), Some("javascript"));
    }
}
