//! Host configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use stagehand_sequencer::PlayOptions;

use crate::error::AppError;

/// Runtime settings for one host run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// `PostgreSQL` connection URL; records stay in memory when unset.
    pub database_url: Option<String>,
    /// Name of the sequence to play.
    pub sequence: String,
    /// Effects to play it with.
    pub play_options: PlayOptions,
    /// User whose registry partitions record the run.
    pub user_id: String,
    /// YAML catalog to load instead of the built-in one.
    pub catalog_path: Option<PathBuf>,
}

impl HostConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let entrance = lookup("STAGEHAND_ENTRANCE").unwrap_or_default();
        let exit = lookup("STAGEHAND_EXIT").unwrap_or_default();
        let mut play_options = PlayOptions::from_names(&entrance, &exit)
            .map_err(|e| AppError::Config(format!("STAGEHAND_ENTRANCE/STAGEHAND_EXIT: {e}")))?;

        if let Some(raw) = lookup("STAGEHAND_EXIT_DURATION_MS") {
            let millis: u64 = raw.parse().map_err(|e| {
                AppError::Config(format!(
                    "STAGEHAND_EXIT_DURATION_MS must be a valid u64: {e}"
                ))
            })?;
            play_options.exit_duration = Some(Duration::from_millis(millis));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            sequence: lookup("STAGEHAND_SEQUENCE").unwrap_or_else(|| "Tutorial".to_string()),
            play_options,
            user_id: lookup("STAGEHAND_USER").unwrap_or_else(|| "0".to_string()),
            catalog_path: lookup("STAGEHAND_CATALOG").map(PathBuf::from),
        })
    }
}
