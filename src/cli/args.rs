//! Clap argument types and input-source validation.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use codecritic::models::ProviderId;
use codecritic::output::{ReviewRenderer, ReviewReport};

/// AI code review from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "codecritic",
    version = codecritic::constants::VERSION,
    about = super::TAGLINE_STYLED,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Review a snippet or a project.
    Review(Box<ReviewArgs>),

    /// List the languages offered for review.
    Languages,

    /// List providers and their configuration status.
    Providers,

    /// Show, edit and roll back saved settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Print version and build information.
    Version,
}

/// Settings subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the effective settings as TOML (API key redacted).
    Show,
    /// Set one key and save the result as a new snapshot.
    Set {
        /// Settings key, e.g. `ollama.model` or `upload.ignored_dirs`.
        key: String,
        /// New value. Lists are comma- or newline-separated.
        value: String,
    },
    /// List saved snapshots, newest first.
    History,
    /// Make an earlier snapshot current again.
    Revert {
        /// Index as shown by `settings history` (0 is current).
        index: usize,
    },
    /// Restore the default upload filter rules.
    ResetUpload,
    /// Save settings read from a TOML file.
    Import {
        /// TOML file with `[providers]` and/or `[upload]` tables.
        file: PathBuf,
    },
    /// Print the settings history file path.
    Path,
}

/// Arguments for the `review` subcommand.
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    // --- Input (one required) ---
    /// Source file to review as a snippet.
    pub file: Option<PathBuf>,

    /// Read the snippet from stdin.
    #[arg(long, default_value_t = false)]
    pub stdin: bool,

    /// Project folder to review as a whole.
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Review the built-in JavaScript sample.
    #[arg(long, default_value_t = false)]
    pub sample: bool,

    // --- Provider ---
    /// AI backend to use.
    #[arg(long, env = "CODECRITIC_PROVIDER", default_value = "gemini")]
    pub provider: ProviderId,

    /// Language identifier (inferred from file extensions when omitted).
    #[arg(long, env = "CODECRITIC_LANGUAGE")]
    pub language: Option<String>,

    // --- Output ---
    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Disable the loading indicator.
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Suppress all non-essential output (banner, progress).
    /// Only the review and errors are shown.
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Render a review using the renderer for this format.
    pub fn render(&self, report: &ReviewReport) -> String {
        match self {
            OutputFormat::Terminal => codecritic::output::terminal::TerminalRenderer.render(report),
            OutputFormat::Json => codecritic::output::json::JsonRenderer.render(report),
        }
    }
}

/// Where the code under review comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
    Project(PathBuf),
    Sample,
}

impl ReviewArgs {
    /// Validate that exactly one input source is provided.
    pub fn validate_input(&self) -> Result<InputSource, String> {
        let sources = [
            self.file.is_some(),
            self.stdin,
            self.project.is_some(),
            self.sample,
        ];
        let count = sources.iter().filter(|&&x| x).count();

        if count == 0 {
            return Err(
                "one input source is required: FILE, --stdin, --project, or --sample".to_string(),
            );
        }
        if count > 1 {
            return Err(
                "only one input source allowed: FILE, --stdin, --project, or --sample".to_string(),
            );
        }

        Ok(if let Some(ref path) = self.file {
            InputSource::File(path.clone())
        } else if self.stdin {
            InputSource::Stdin
        } else if let Some(ref path) = self.project {
            InputSource::Project(path.clone())
        } else {
            InputSource::Sample
        })
    }
}
