//! codecritic: AI code review CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use codecritic::config;
use codecritic::constants;
use codecritic::env;
use codecritic::ingest;
use codecritic::models;
use codecritic::output;
use codecritic::progress;
use codecritic::providers;
use codecritic::session;

use std::io::IsTerminal;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use cli::args::{Cli, Command, InputSource, OutputFormat, ReviewArgs, SettingsAction};
use config::history;
use config::{
    AppConfig, BackendSettings, ConfigStore, FileHistoryStore, MemoryHistoryStore,
    UploadFilterRules,
};
use env::Env;
use models::{ProviderId, ReviewInput};
use progress::ProgressReporter;
use providers::Dispatcher;
use session::ReviewSession;

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `CODECRITIC_LOG` (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(constants::ENV_LOG)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Review(args) => run_review(*args).await,
        Command::Languages => run_languages(),
        Command::Providers => run_providers(),
        Command::Settings { action } => run_settings(action),
        Command::Version => run_version(),
    }
}

/// Print detailed version and build information.
fn run_version() -> Result<()> {
    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    Ok(())
}

/// Open the settings history, falling back to an in-memory store when
/// the platform has no config directory.
fn open_store() -> Box<dyn ConfigStore> {
    match FileHistoryStore::default_location() {
        Ok(store) => Box::new(store),
        Err(e) => {
            eprintln!("Warning: {e}. Settings will not be saved.");
            Box::new(MemoryHistoryStore::default())
        }
    }
}

/// List the supported-language table.
fn run_languages() -> Result<()> {
    for lang in models::language::SUPPORTED_LANGUAGES {
        let extensions: Vec<String> = lang.extensions.iter().map(|e| format!(".{e}")).collect();
        println!(
            "  {:<12} {:<12} {}",
            lang.id.bold(),
            lang.name,
            extensions.join(" ").dimmed()
        );
    }
    Ok(())
}

/// List providers with their effective configuration.
fn run_providers() -> Result<()> {
    let store = open_store();
    let config = AppConfig::load(store.as_ref(), &Env::real());

    for id in ProviderId::iter() {
        let (ready, detail) = match config.providers.settings_for(id) {
            BackendSettings::Cloud(cloud) => {
                let key = if cloud.api_key().is_some() {
                    "API key set"
                } else {
                    "API key missing"
                };
                (cloud.api_key().is_some(), format!("{key}, model {}", cloud.model))
            }
            BackendSettings::Local(endpoint) => (
                endpoint.is_complete(),
                format!("{} ({})", endpoint.url, endpoint.model),
            ),
        };
        let icon = if ready {
            "✔".green().bold()
        } else {
            "✖".red().bold()
        };
        println!(
            "  {icon} {:<10} {:<10} {}",
            id.to_string().bold(),
            id.display_name(),
            detail.dimmed()
        );
    }
    Ok(())
}

/// Manage saved settings.
fn run_settings(action: SettingsAction) -> Result<()> {
    let store = open_store();
    let store = store.as_ref();

    match action {
        SettingsAction::Show => {
            let config = AppConfig::load(store, &Env::real());
            print!("{}", config.to_redacted_toml()?);
        }
        SettingsAction::Set { key, value } => {
            let mut config = history::current(store).context("failed to read saved settings")?;
            config.set(&key, &value)?;
            history::save(store, config).context("failed to save settings")?;
            println!("  {} Saved {}.", "✔".green().bold(), key.bold());
        }
        SettingsAction::History => {
            let entries = history::entries(store).context("failed to read settings history")?;
            if entries.is_empty() {
                println!("No saved settings. Defaults are in use.");
            }
            for (index, snapshot) in entries.iter().enumerate() {
                let providers = &snapshot.config.providers;
                let marker = if index == 0 { "current".green().to_string() } else { String::new() };
                println!(
                    "  {:>2}  {}  {}  {}",
                    index,
                    snapshot.display_time(),
                    format!(
                        "gemini key {}, ollama {}, lmstudio {}",
                        if providers.gemini.api_key().is_some() { "set" } else { "unset" },
                        providers.ollama.model,
                        providers.lmstudio.model,
                    )
                    .dimmed(),
                    marker,
                );
            }
        }
        SettingsAction::Revert { index } => {
            let snapshot = history::revert(store, index)?;
            println!(
                "  {} Restored settings from {}.",
                "✔".green().bold(),
                snapshot.display_time()
            );
        }
        SettingsAction::ResetUpload => {
            let mut config = history::current(store).context("failed to read saved settings")?;
            config.upload = UploadFilterRules::default();
            history::save(store, config).context("failed to save settings")?;
            println!("  {} Upload rules reset to defaults.", "✔".green().bold());
        }
        SettingsAction::Import { file } => {
            let config = AppConfig::from_toml_file(&file)?;
            history::save(store, config).context("failed to save settings")?;
            println!(
                "  {} Imported settings from {}.",
                "✔".green().bold(),
                file.display()
            );
        }
        SettingsAction::Path => match FileHistoryStore::default_location() {
            Ok(store) => println!("{}", store.path().display()),
            Err(e) => bail!("{e}"),
        },
    }

    Ok(())
}

async fn run_review(args: ReviewArgs) -> Result<()> {
    let source = args.validate_input().map_err(|e| anyhow::anyhow!("{e}"))?;

    let store = open_store();
    let config = AppConfig::load(store.as_ref(), &Env::real());

    let input = build_input(&source, args.language.as_deref(), &config).await?;

    // Progress goes to stderr; keep it off for JSON and non-interactive runs.
    let show_progress = !args.no_progress
        && !args.quiet
        && args.format == OutputFormat::Terminal
        && std::io::stderr().is_terminal();
    if show_progress {
        cli::print_banner();
    }
    let reporter = Arc::new(ProgressReporter::new(&input, args.provider, show_progress));

    let review_session =
        ReviewSession::new(Arc::new(Dispatcher::with_defaults())).with_observer(reporter);
    let report_input = input.clone();

    match review_session
        .submit_review(input, args.provider, &config.providers)
        .await
    {
        Ok(review) => {
            let report = output::ReviewReport::new(&report_input, args.provider, review);
            print!("{}", args.format.render(&report));
            Ok(())
        }
        Err(err) => bail!("{}", session::display_message(&err)),
    }
}

/// Turn the chosen input source into a review input.
async fn build_input(
    source: &InputSource,
    language: Option<&str>,
    config: &AppConfig,
) -> Result<ReviewInput> {
    let language = language.map(str::trim).filter(|l| !l.is_empty());

    Ok(match source {
        InputSource::File(path) => {
            let code = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let language = language
                .or_else(|| models::language::from_path(path).map(|l| l.id))
                .unwrap_or(constants::DEFAULT_LANGUAGE);
            ReviewInput::snippet(code, language)
        }
        InputSource::Stdin => {
            use tokio::io::AsyncReadExt;
            let mut code = String::new();
            tokio::io::stdin()
                .read_to_string(&mut code)
                .await
                .context("failed to read stdin")?;
            ReviewInput::snippet(code, language.unwrap_or(constants::DEFAULT_LANGUAGE))
        }
        InputSource::Project(root) => {
            let files = ingest::collect_project_files(root, &config.upload)
                .await
                .with_context(|| format!("failed to read project {}", root.display()))?;
            let language = language
                .or_else(|| {
                    models::language::dominant(files.iter().map(|f| f.path.as_str()))
                        .map(|l| l.id)
                })
                .unwrap_or(constants::DEFAULT_LANGUAGE)
                .to_string();
            ReviewInput::project(files, language)
        }
        InputSource::Sample => ReviewInput::snippet(
            constants::SAMPLE_CODE_SNIPPET,
            language.unwrap_or(constants::DEFAULT_LANGUAGE),
        ),
    })
}
