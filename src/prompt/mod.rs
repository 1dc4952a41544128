//! Review prompt construction.
//!
//! Pure functions: the same input always yields byte-identical output.
//! The language identifier is interpolated verbatim into prose and fence
//! labels and is never validated here.

use crate::models::{ProjectFile, ReviewInput, ReviewMode};

/// A Markdown section the model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    /// May contain `{language}`, substituted at build time.
    pub guidance: &'static str,
}

/// Sections of a snippet review, in order.
pub const SNIPPET_SECTIONS: [Section; 5] = [
    Section {
        heading: "🐛 Potential Bugs & Errors",
        guidance: "Identify any logical flaws, off-by-one errors, race conditions, or unhandled edge cases.",
    },
    Section {
        heading: "⚡️ Performance & Optimization",
        guidance: "Analyze for performance bottlenecks. Suggest improvements in algorithmic efficiency, memory usage, and resource management.",
    },
    Section {
        heading: "🎨 Readability & Best Practices",
        guidance: "Evaluate against established best practices and style guides for {language}. Comment on naming, clarity, organization, and maintainability.",
    },
    Section {
        heading: "🔒 Security Vulnerabilities",
        guidance: "Scrutinize for common security risks (e.g., injection, XSS, insecure data handling).",
    },
    Section {
        heading: "✅ Summary & Overall Recommendation",
        guidance: "Provide a brief summary and an overall recommendation (e.g., \"Approved with minor suggestions,\" \"Requires changes,\" \"Major rework needed\").",
    },
];

/// Sections of a whole-project review, in order.
pub const PROJECT_SECTIONS: [Section; 6] = [
    Section {
        heading: "🏛️ Architectural Overview",
        guidance: "Analyze the overall project structure, design patterns, and separation of concerns. Identify any major architectural flaws or suggest improvements.",
    },
    Section {
        heading: "🧩 Component & Module Analysis",
        guidance: "Review the individual components/files for their role and effectiveness. Identify tightly coupled modules, potential circular dependencies, or code smells that span multiple files.",
    },
    Section {
        heading: "🎨 Consistency & Best Practices",
        guidance: "Check for consistency in coding style, naming conventions, and error handling across the entire project.",
    },
    Section {
        heading: "⚡️ Performance & Optimization",
        guidance: "Identify any project-wide performance issues, such as inefficient data loading, redundant computations, or potential memory leaks.",
    },
    Section {
        heading: "🔒 Security Vulnerabilities",
        guidance: "Look for security risks at the application level, such as improper handling of secrets, insecure API design, or lack of proper validation.",
    },
    Section {
        heading: "✅ Summary & Next Steps",
        guidance: "Provide a high-level summary of your findings and suggest a prioritized list of next steps for improving the codebase.",
    },
];

const CLOSING_INSTRUCTION: &str =
    "Provide only the Markdown-formatted review. Do not include any conversational pleasantries.";

/// Build the single combined prompt used by the cloud provider.
pub fn build_prompt(input: &ReviewInput) -> String {
    match input {
        ReviewInput::Snippet { code, language } => build_snippet_prompt(code, language),
        ReviewInput::Project { files, language } => build_project_prompt(files, language),
    }
}

fn build_snippet_prompt(code: &str, language: &str) -> String {
    let mut prompt = String::from(
        "You are an expert software engineer acting as an automated code review tool.\n\
         Your analysis must be rigorous, insightful, and constructive.\n\n",
    );
    prompt.push_str(&format!(
        "Please provide a detailed review of the following {language} code snippet.\n\
         Structure your feedback in Markdown format with the following sections:\n\n"
    ));
    push_sections(&mut prompt, &SNIPPET_SECTIONS, language);
    prompt.push_str(&format!(
        "Here is the code to review:\n{}\n\n{CLOSING_INSTRUCTION}\n",
        fenced(code, language)
    ));
    prompt
}

fn build_project_prompt(files: &[ProjectFile], language: &str) -> String {
    let mut prompt = String::from(
        "You are an expert software engineer tasked with a holistic code review of an entire project.\n\
         Your analysis must focus on overall architecture, code consistency, and inter-dependencies.\n\n",
    );
    prompt.push_str(&format!(
        "Please provide a detailed review of the following project, which is primarily written in {language}.\n\
         Structure your feedback in Markdown format with these sections:\n\n"
    ));
    push_sections(&mut prompt, &PROJECT_SECTIONS, language);
    prompt.push_str(&format!(
        "Here is the entire project structure and content:\n{}\n\n{CLOSING_INSTRUCTION}\n",
        serialize_files(files, "\n\n---\n\n")
    ));
    prompt
}

/// Build the system message for local chat-completion providers.
///
/// Describes the same section taxonomy at a higher level; the code itself
/// goes in the user message (see [`build_local_user_message`]).
pub fn build_system_prompt(mode: ReviewMode, language: &str) -> String {
    let task = match mode {
        ReviewMode::Project => format!(
            "Your task is to conduct a holistic code review of an entire project, primarily in {language}. \
             Analyze architecture, consistency, and inter-dependencies."
        ),
        ReviewMode::Snippet => {
            format!("Please provide a detailed review of the provided {language} code snippet.")
        }
    };
    format!(
        "You are an expert software engineer acting as an automated code review tool.\n\
         Your analysis must be rigorous, insightful, and constructive.\n\
         {task}\n\
         Structure your feedback in Markdown format with appropriate sections \
         (e.g., Architecture, Bugs, Performance, Readability, Security, Summary).\n\
         Provide only the Markdown-formatted review.\n"
    )
}

/// Build the user message for local chat-completion providers.
pub fn build_local_user_message(input: &ReviewInput) -> String {
    match input {
        ReviewInput::Snippet { code, language } => {
            format!("Here is the code to review:\n{}", fenced(code, language))
        }
        ReviewInput::Project { files, .. } => format!(
            "Here is the entire project to review:\n{}",
            serialize_files(files, "\n---\n")
        ),
    }
}

fn push_sections(prompt: &mut String, sections: &[Section], language: &str) {
    for section in sections {
        prompt.push_str(&format!(
            "### {}\n{}\n\n",
            section.heading,
            section.guidance.replace("{language}", language)
        ));
    }
}

fn fenced(code: &str, language: &str) -> String {
    format!("```{language}\n{code}\n```")
}

/// `File: <path>` plus an unlabeled fence per file, in input order.
fn serialize_files(files: &[ProjectFile], separator: &str) -> String {
    files
        .iter()
        .map(|file| format!("File: `{}`\n```\n{}\n```", file.path, file.content))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn headings(prompt: &str) -> Vec<&str> {
        prompt
            .lines()
            .filter_map(|line| line.strip_prefix("### "))
            .collect()
    }

    fn sample_project() -> Vec<ProjectFile> {
        vec![
            ProjectFile::new("shop/src/cart.ts", "export const total = 0;"),
            ProjectFile::new("shop/src/api/client.ts", "fetch('/items');"),
            ProjectFile::new("shop/README.md", "# Shop"),
        ]
    }

    #[test]
    fn snippet_prompt_contains_code_language_and_five_sections() {
        let code = "def add(a, b):\n    return a - b";
        let prompt = build_prompt(&ReviewInput::snippet(code, "python"));

        assert!(prompt.contains(code));
        assert!(prompt.contains("```python\n"));
        assert!(prompt.contains("following python code snippet"));
        assert!(prompt.contains("style guides for python."));
        let expected: Vec<_> = SNIPPET_SECTIONS.iter().map(|s| s.heading).collect();
        assert_eq!(headings(&prompt), expected);
        assert!(prompt.ends_with(&format!("{CLOSING_INSTRUCTION}\n")));
    }

    #[test]
    fn project_prompt_lists_six_sections_and_every_file_in_order() {
        let files = sample_project();
        let prompt = build_prompt(&ReviewInput::project(files.clone(), "typescript"));

        let expected: Vec<_> = PROJECT_SECTIONS.iter().map(|s| s.heading).collect();
        assert_eq!(headings(&prompt), expected);
        assert!(prompt.contains("primarily written in typescript"));

        assert_eq!(prompt.matches("File: `").count(), files.len());
        assert_eq!(prompt.matches("```").count(), files.len() * 2);
        assert_eq!(prompt.matches("\n\n---\n\n").count(), files.len() - 1);

        let positions: Vec<usize> = files
            .iter()
            .map(|f| prompt.find(&format!("File: `{}`\n```\n{}\n```", f.path, f.content)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prompts_are_deterministic() {
        let input = ReviewInput::project(sample_project(), "typescript");
        assert_eq!(build_prompt(&input), build_prompt(&input));
        assert_eq!(build_local_user_message(&input), build_local_user_message(&input));
    }

    #[test]
    fn unknown_language_is_passed_through() {
        let prompt = build_prompt(&ReviewInput::snippet("x := 1", "zig-ish"));
        assert!(prompt.contains("```zig-ish\nx := 1\n```"));
        assert!(prompt.contains("following zig-ish code snippet"));
    }

    #[test]
    fn system_prompt_depends_on_mode() {
        let snippet = build_system_prompt(ReviewMode::Snippet, "go");
        assert!(snippet.contains("review of the provided go code snippet"));
        assert!(!snippet.contains("holistic"));

        let project = build_system_prompt(ReviewMode::Project, "go");
        assert!(project.contains("entire project, primarily in go"));
        assert!(project.contains("Architecture, Bugs, Performance, Readability, Security, Summary"));
    }

    #[test]
    fn local_user_message_for_snippet() {
        let message = build_local_user_message(&ReviewInput::snippet("let x = 1;", "javascript"));
        assert_eq!(message, "Here is the code to review:\n```javascript\nlet x = 1;\n```");
    }

    #[test]
    fn local_user_message_for_project() {
        let files = vec![ProjectFile::new("a/x.rs", "fn x() {}"), ProjectFile::new("a/y.rs", "fn y() {}")];
        let message = build_local_user_message(&ReviewInput::project(files, "rust"));
        assert_eq!(
            message,
            "Here is the entire project to review:\n\
             File: `a/x.rs`\n```\nfn x() {}\n```\n---\nFile: `a/y.rs`\n```\nfn y() {}\n```"
        );
    }
}
