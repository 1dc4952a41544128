//! Bounded history of saved settings snapshots.
//!
//! Every save prepends an immutable, timestamped snapshot; the list is kept
//! newest-first and capped at [`MAX_HISTORY_ENTRIES`]. The head is the
//! current settings. Review code never touches this module: it only sees
//! the resolved [`ProviderConfig`](super::ProviderConfig).

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::constants::MAX_HISTORY_ENTRIES;

use super::loader::{AppConfig, ConfigError};

/// One saved settings state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub config: AppConfig,
}

impl ConfigSnapshot {
    /// Snapshot `config` as of now.
    pub fn new(config: AppConfig) -> Self {
        Self::at(chrono::Utc::now().timestamp_millis(), config)
    }

    pub fn at(timestamp: i64, config: AppConfig) -> Self {
        Self { timestamp, config }
    }

    /// Local-time rendering for listings.
    pub fn display_time(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.timestamp)
            .map(|utc| {
                utc.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

/// Prepend `snapshot` and evict the oldest entries beyond the cap.
pub fn push_capped(mut history: Vec<ConfigSnapshot>, snapshot: ConfigSnapshot) -> Vec<ConfigSnapshot> {
    history.insert(0, snapshot);
    history.truncate(MAX_HISTORY_ENTRIES);
    history
}

/// Persistence port for settings history.
pub trait ConfigStore: Send + Sync {
    /// All snapshots, newest first.
    fn load(&self) -> Result<Vec<ConfigSnapshot>, ConfigError>;

    /// Prepend a snapshot and return the resulting (capped) history.
    fn append(&self, snapshot: ConfigSnapshot) -> Result<Vec<ConfigSnapshot>, ConfigError>;
}

/// Save `config` as the new current settings.
pub fn save(store: &dyn ConfigStore, config: AppConfig) -> Result<ConfigSnapshot, ConfigError> {
    let snapshot = ConfigSnapshot::new(config);
    store.append(snapshot.clone())?;
    Ok(snapshot)
}

/// The saved snapshots, newest first. A corrupt history reads as empty.
pub fn entries(store: &dyn ConfigStore) -> Result<Vec<ConfigSnapshot>, ConfigError> {
    match store.load() {
        Ok(history) => Ok(history),
        Err(e @ ConfigError::ParseHistory { .. }) => {
            tracing::warn!(error = %e, "ignoring corrupt settings history");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// The saved settings: the history head, or the defaults when empty.
pub fn current(store: &dyn ConfigStore) -> Result<AppConfig, ConfigError> {
    Ok(entries(store)?
        .into_iter()
        .next()
        .map(|snapshot| snapshot.config)
        .unwrap_or_default())
}

/// Make history entry `index` current again by saving a copy of it.
///
/// The old entry stays where it is; the copy becomes the new head.
pub fn revert(store: &dyn ConfigStore, index: usize) -> Result<ConfigSnapshot, ConfigError> {
    let history = entries(store)?;
    let len = history.len();
    let target = history
        .into_iter()
        .nth(index)
        .ok_or(ConfigError::HistoryIndex { index, len })?;
    save(store, target.config)
}

/// JSON file store, by default `<config dir>/codecritic/history.json`.
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the platform settings location.
    pub fn default_location() -> Result<Self, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(
            dir.join(crate::constants::CONFIG_DIR)
                .join(crate::constants::HISTORY_FILENAME),
        ))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ConfigStore for FileHistoryStore {
    fn load(&self) -> Result<Vec<ConfigSnapshot>, ConfigError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::ReadHistory {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseHistory {
            path: self.path.clone(),
            source: e,
        })
    }

    fn append(&self, snapshot: ConfigSnapshot) -> Result<Vec<ConfigSnapshot>, ConfigError> {
        // A corrupt file must not block saving; it is replaced.
        let existing = match self.load() {
            Ok(history) => history,
            Err(e @ ConfigError::ParseHistory { .. }) => {
                tracing::warn!(error = %e, "discarding corrupt settings history");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let history = push_capped(existing, snapshot);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteHistory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let content = serde_json::to_string_pretty(&history)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| ConfigError::WriteHistory {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(history)
    }
}

/// In-process store for tests and embedders.
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<Vec<ConfigSnapshot>>,
}

impl ConfigStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<ConfigSnapshot>, ConfigError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn append(&self, snapshot: ConfigSnapshot) -> Result<Vec<ConfigSnapshot>, ConfigError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        *entries = push_capped(std::mem::take(&mut *entries), snapshot);
        Ok(entries.clone())
    }
}
