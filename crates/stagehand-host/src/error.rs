//! Stagehand host — error types.

use stagehand_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the host runner.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Reading a catalog file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A registry or sequencer operation was rejected.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
