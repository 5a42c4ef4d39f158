//! # Error Types
//!
//! Classification itself is total and never produces an error. Everything in
//! here comes from configuration edits, the binary format, or the store.

use crate::config::ConfigError;
use crate::dimension::DimensionId;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AgentSizeError>;

/// Errors surfaced by the engine's configuration and persistence layers.
#[derive(Debug, Error)]
pub enum AgentSizeError {
    /// A rules configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A dimension id that is not in the catalog.
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    /// A score outside `1..=3`.
    #[error("score {score} for {dimension} is outside 1..=3")]
    InvalidScore { dimension: DimensionId, score: i64 },

    /// A binary snapshot had a bad header or unsupported version.
    #[error("format error: {0}")]
    Format(String),

    /// postcard encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] postcard::Error),

    /// The redb store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AgentSizeError {
    pub(crate) fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}
