//! Stagehand host entry point.
//!
//! Plays one catalog sequence on the terminal and records the run in the
//! user's registry partitions.

use std::error::Error;
use std::sync::{Arc, Mutex};

use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use stagehand_core::clock::SystemClock;
use stagehand_core::rng::{DeterministicRng, SystemRng};
use stagehand_core::scheduler::TokioScheduler;
use stagehand_core::store::KeyValueStore;
use stagehand_registry::{Partition, Registry, UserId, WriteOutcome};
use stagehand_sequencer::{Catalog, PlaybackOutcome, Sequencer};
use stagehand_store::{MemoryStore, PgKeyValueStore};
use tracing_subscriber::EnvFilter;

mod config;
mod console;
mod error;

use config::HostConfig;
use console::ConsoleDisplay;
use error::AppError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr; stdout belongs to the display.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!("Starting Stagehand host");

    let config = HostConfig::from_env()?;
    let store = connect_store(&config).await?;
    let registry = Registry::new(store, Arc::new(SystemClock));
    let user_id = UserId::from(config.user_id.as_str());

    let catalog = load_catalog(&config).await?;
    tracing::info!(sequences = catalog.len(), "catalog loaded");
    let rng: Arc<Mutex<dyn DeterministicRng>> = Arc::new(Mutex::new(SystemRng::from_os()));
    let sequencer = Sequencer::new(Arc::new(catalog), Arc::new(TokioScheduler), rng);

    let logged = registry
        .log(&user_id, &format!("playing {}", config.sequence))
        .await?;
    warn_if_failed(&logged, "run start");

    let handle = sequencer.play(
        &config.sequence,
        Arc::new(ConsoleDisplay::new()),
        config.play_options,
        |index, entry| tracing::info!(index, text = %entry.text, "entry completed"),
    )?;
    tracing::info!(session_id = %handle.id(), sequence = %config.sequence, "playback started");

    let cancel = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling playback");
            cancel.cancel();
        }
    });

    let outcome = handle.wait().await?;
    record_outcome(&registry, &user_id, &config.sequence, outcome).await?;

    Ok(())
}

/// A `PostgreSQL` store when `DATABASE_URL` is set, otherwise an in-memory one.
async fn connect_store(config: &HostConfig) -> Result<Arc<dyn KeyValueStore>, AppError> {
    let Some(database_url) = &config.database_url else {
        tracing::info!("DATABASE_URL not set, using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    let store = PgKeyValueStore::new(pool);
    store.ensure_schema().await?;
    Ok(Arc::new(store))
}

async fn load_catalog(config: &HostConfig) -> Result<Catalog, AppError> {
    match &config.catalog_path {
        Some(path) => {
            let source = tokio::fs::read_to_string(path).await?;
            parse_catalog(&source)
        }
        None => Ok(Catalog::builtin()),
    }
}

/// Parses a `STAGEHAND_CATALOG` document, which must name at least one
/// sequence.
fn parse_catalog(source: &str) -> Result<Catalog, AppError> {
    let catalog = Catalog::from_yaml(source)?;
    if catalog.is_empty() {
        return Err(AppError::Config(
            "STAGEHAND_CATALOG defines no sequences".to_owned(),
        ));
    }
    Ok(catalog)
}

async fn record_outcome(
    registry: &Registry,
    user_id: &UserId,
    sequence: &str,
    outcome: PlaybackOutcome,
) -> Result<(), AppError> {
    let (completed, played) = match outcome {
        PlaybackOutcome::Completed { entries } => (true, entries),
        PlaybackOutcome::Cancelled { completed_entries } => (false, completed_entries),
    };
    tracing::info!(completed, played, "playback ended");

    let progress = json!({ "sequence": sequence, "completed": completed, "entries": played });
    let recorded = registry
        .append(user_id, Partition::Progress.as_str(), &progress)
        .await?;
    warn_if_failed(&recorded, "progress");

    if !completed {
        let text = format!("{sequence} interrupted after {played} entries");
        let commented = registry.comment(user_id, &text, "host").await?;
        warn_if_failed(&commented, "interruption comment");
    }
    Ok(())
}

fn warn_if_failed(outcome: &WriteOutcome, what: &str) {
    if let Some(detail) = outcome.detail() {
        tracing::warn!(%detail, "{what} was not recorded");
    }
}
