//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! provider defaults and upload rules so a rename only requires changing
//! this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "codecritic";

/// Package version baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compilation target triple (set by `build.rs`).
pub const TARGET: &str = env!("TARGET");

/// Directory name under the platform config dir for settings history.
pub const CONFIG_DIR: &str = "codecritic";

/// Settings history filename inside [`CONFIG_DIR`].
pub const HISTORY_FILENAME: &str = "history.json";

/// Footer shown under rendered reviews.
pub const AI_DISCLOSURE: &str = "Reviews are AI-generated and may be inaccurate. Verify before acting on them.";

/// Maximum number of settings snapshots retained in history.
pub const MAX_HISTORY_ENTRIES: usize = 10;

// ── Provider defaults ───────────────────────────────────────────────

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1/chat/completions";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";
pub const DEFAULT_LMSTUDIO_URL: &str = "http://localhost:1234/v1/chat/completions";
/// LM Studio usually serves whatever model is loaded under a generic name.
pub const DEFAULT_LMSTUDIO_MODEL: &str = "local-model";

/// Language used when none is given and none can be inferred.
pub const DEFAULT_LANGUAGE: &str = "javascript";

// ── Upload filter defaults ──────────────────────────────────────────

pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    ".js", ".jsx", ".ts", ".tsx", ".py", ".java", ".cs", ".go", ".rs", ".rb", ".php",
    ".html", ".css", ".scss", ".sql", ".json", ".md", ".yml", ".yaml", ".toml", ".ini",
    "Dockerfile", ".sh", ".ps1", ".xml", ".env.example",
];

pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    "node_modules", ".git", ".vscode", "dist", "build", "out", "coverage", ".next", ".idea",
];

pub const DEFAULT_IGNORED_FILES: &[&str] = &["package-lock.json", "yarn.lock", "pnpm-lock.yaml"];

// ── Environment variable names ──────────────────────────────────────

pub const ENV_PROVIDER: &str = "CODECRITIC_PROVIDER";
pub const ENV_LANGUAGE: &str = "CODECRITIC_LANGUAGE";
pub const ENV_LOG: &str = "CODECRITIC_LOG";
pub const ENV_GEMINI_API_KEY: &str = "CODECRITIC_GEMINI_API_KEY";
/// Conventional Google variable, consulted when [`ENV_GEMINI_API_KEY`] is unset.
pub const ENV_GEMINI_API_KEY_FALLBACK: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "CODECRITIC_GEMINI_MODEL";
pub const ENV_OLLAMA_URL: &str = "CODECRITIC_OLLAMA_URL";
pub const ENV_OLLAMA_MODEL: &str = "CODECRITIC_OLLAMA_MODEL";
pub const ENV_LMSTUDIO_URL: &str = "CODECRITIC_LMSTUDIO_URL";
pub const ENV_LMSTUDIO_MODEL: &str = "CODECRITIC_LMSTUDIO_MODEL";

/// Snippet loaded by `review --sample`. It has a few issues for the model to find.
pub const SAMPLE_CODE_SNIPPET: &str = r#"// This function has a few issues for the AI to find.
function processNumbers(data) {
  var largest = 0; // Bug: Fails for lists of only negative numbers.
  var sum = "0";   // Bug: Should be a number, not a string.

  // Inefficiently finds the largest number in a nested loop.
  for (var i = 0; i < data.length; i++) {
    for (var j = 0; j < data.length; j++) {
      if (data[j] > largest) {
        largest = data[j];
      }
    }
    sum = sum + data[i]; // Performance: String concatenation in a loop is slow.
  }

  // 'var' is outdated; 'let' or 'const' should be used.
  console.log("The largest number is: " + largest);
  console.log("The sum is: " + sum);

  return { largest, sum };
}"#;
