//! Settings loading, layering and history.
//!
//! Handles the provider/upload settings, environment variable overrides,
//! and the bounded history of saved snapshots.

pub mod history;
pub mod loader;

pub use history::{ConfigSnapshot, ConfigStore, FileHistoryStore, MemoryHistoryStore};
pub use loader::{
    AppConfig, BackendSettings, CloudSettings, ConfigError, LocalEndpoint, ProviderConfig,
    UploadFilterRules,
};
