//! codecritic: AI code review over cloud and local LLM providers (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod env;
pub mod ingest;
pub mod models;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod providers;
pub mod session;
