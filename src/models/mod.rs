//! Shared types used across all modules.
//!
//! This module defines the review input, provider identifiers and the
//! supported-language table. Other modules import from here rather than
//! reaching into each other's internals.

pub mod input;
pub mod language;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

pub use input::{ProjectFile, ReviewInput};
pub use language::Language;

/// Supported AI backends.
///
/// One cloud provider that needs a secret key, and two local servers that
/// only need a reachable URL and a model name.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[default]
    Gemini,
    Ollama,
    #[value(name = "lmstudio")]
    LmStudio,
}

impl ProviderId {
    /// Human-readable name used in messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderId::Gemini => "Gemini",
            ProviderId::Ollama => "Ollama",
            ProviderId::LmStudio => "LM Studio",
        }
    }

    /// Whether the provider runs on a user-hosted server.
    pub fn is_local(self) -> bool {
        !matches!(self, ProviderId::Gemini)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::Gemini => write!(f, "gemini"),
            ProviderId::Ollama => write!(f, "ollama"),
            ProviderId::LmStudio => write!(f, "lmstudio"),
        }
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(ProviderId::Gemini),
            "ollama" => Ok(ProviderId::Ollama),
            "lmstudio" => Ok(ProviderId::LmStudio),
            _ => Err(s.trim().to_string()),
        }
    }
}

/// Whether a review covers one snippet or a whole project upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReviewMode {
    Snippet,
    Project,
}
