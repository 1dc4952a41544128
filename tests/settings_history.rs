//! Integration tests for settings persistence and startup resolution.

use codecritic::config::history::{self, ConfigSnapshot};
use codecritic::config::{AppConfig, ConfigStore, FileHistoryStore, UploadFilterRules};
use codecritic::constants::MAX_HISTORY_ENTRIES;
use codecritic::env::Env;

fn store_in(dir: &tempfile::TempDir) -> FileHistoryStore {
    FileHistoryStore::new(dir.path().join("codecritic").join("history.json"))
}

#[test]
fn history_is_capped_and_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    for i in 0..15 {
        let mut config = AppConfig::default();
        config.set("ollama.model", &format!("model-{i}")).unwrap();
        store.append(ConfigSnapshot::at(i, config)).unwrap();
    }

    let entries = store.load().unwrap();
    assert_eq!(entries.len(), MAX_HISTORY_ENTRIES);
    assert_eq!(entries[0].config.providers.ollama.model, "model-14");
    assert_eq!(entries[MAX_HISTORY_ENTRIES - 1].config.providers.ollama.model, "model-5");
}

#[test]
fn head_of_history_is_loaded_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let mut config = AppConfig::default();
    config.set("lmstudio.url", "http://gpu-box:1234/v1/chat/completions").unwrap();
    config.set("upload.ignored_dirs", "target, vendor").unwrap();
    history::save(&store, config).unwrap();

    let loaded = AppConfig::load(&store, &Env::real());
    assert_eq!(
        loaded.providers.lmstudio.url,
        "http://gpu-box:1234/v1/chat/completions"
    );
    assert_eq!(loaded.upload.ignored_dirs, vec!["target", "vendor"]);
}

#[test]
fn corrupt_history_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "[{\"timestamp\": ").unwrap();

    let loaded = AppConfig::load(&store, &Env::real());
    assert_eq!(loaded.upload, UploadFilterRules::default());
    assert_eq!(loaded.providers.ollama.model, "llama3");
}

#[test]
fn revert_and_reset_upload_add_new_heads() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let mut first = AppConfig::default();
    first.set("upload.allowed_extensions", ".rs\n.toml").unwrap();
    history::save(&store, first).unwrap();
    let mut second = history::current(&store).unwrap();
    second.set("ollama.model", "codellama").unwrap();
    history::save(&store, second).unwrap();

    history::revert(&store, 1).unwrap();
    let current = history::current(&store).unwrap();
    assert_eq!(current.providers.ollama.model, "llama3");
    assert_eq!(current.upload.allowed_extensions, vec![".rs", ".toml"]);

    let mut reset = history::current(&store).unwrap();
    reset.upload = UploadFilterRules::default();
    history::save(&store, reset).unwrap();

    let entries = store.load().unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].config.upload, UploadFilterRules::default());
    assert_eq!(entries[2].config.providers.ollama.model, "codellama");
}

#[test]
fn imported_toml_keeps_defaults_for_missing_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        r#"
[providers.ollama]
url = "http://10.0.0.5:11434/v1/chat/completions"
model = "deepseek-coder"
"#,
    )
    .unwrap();

    let config = AppConfig::from_toml_file(&path).unwrap();
    assert_eq!(config.providers.ollama.model, "deepseek-coder");
    assert_eq!(config.providers.lmstudio.model, "local-model");
    assert_eq!(config.upload, UploadFilterRules::default());

    let store = store_in(&dir);
    history::save(&store, config.clone()).unwrap();
    assert_eq!(history::current(&store).unwrap(), config);
}

#[test]
fn shown_settings_redact_the_api_key() {
    let mut config = AppConfig::default();
    config.set("gemini.api_key", "AIza-very-secret").unwrap();

    let shown = config.to_redacted_toml().unwrap();
    assert!(!shown.contains("AIza-very-secret"));
    assert!(shown.contains("[REDACTED]"));
    assert!(!format!("{config:?}").contains("AIza-very-secret"));
}

#[test]
fn settings_edit_recovers_a_corrupt_history() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "[{").unwrap();

    let mut config = history::current(&store).unwrap();
    assert_eq!(config, AppConfig::default());
    config.set("ollama.model", "phi3").unwrap();
    history::save(&store, config).unwrap();

    let current = history::current(&store).unwrap();
    assert_eq!(current.providers.ollama.model, "phi3");
    assert_eq!(store.load().unwrap().len(), 1);
}
