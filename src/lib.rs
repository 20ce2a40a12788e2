//! Show Spotter - TV show search and favorites
//!
//! This library provides the core functionality for searching the TVMaze
//! catalog, browsing it page by page, looking at show details, and keeping
//! a persistent list of favorite shows.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod favorites;
pub mod render;
pub mod session;
pub mod storage;

pub use catalog::{
    CatalogProvider, FetchError, Rating, ShowDetail, ShowId, ShowSummary, TvMazeCatalog,
};
pub use config::{AppConfig, ConfigError};
pub use controller::{Message, Tab, ViewState};
pub use favorites::FavoritesStore;
pub use session::Session;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

use std::io;
use thiserror::Error;

/// Top-level error type for Show Spotter operations
#[derive(Debug, Error)]
pub enum ShowSpotterError {
    /// Error while talking to the show catalog
    #[error("Catalog error: {0}")]
    Fetch(#[from] FetchError),

    /// Error during storage operations
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error while loading the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A session backed by the TVMaze API and favorites on disk.
pub type DefaultSession = Session<TvMazeCatalog, FileStorage>;

/// Opens a session from the given configuration
///
/// Builds the TVMaze catalog client, opens the favorites storage in the
/// configured data directory (or the platform default), and loads the stored
/// favorites. No catalog request is made yet.
///
/// # Examples
///
/// ```no_run
/// use show_spotter::{open_session, AppConfig, Message};
///
/// let config = AppConfig::load(None).unwrap();
/// let mut session = open_session(&config).unwrap();
///
/// session.dispatch(Message::SearchSubmitted("Breaking Bad".to_string()));
/// for show in session.displayed_shows() {
///     println!("{} ({})", show.title, show.rating);
/// }
/// ```
pub fn open_session(config: &AppConfig) -> Result<DefaultSession, ShowSpotterError> {
    let catalog = TvMazeCatalog::new(&config.catalog)?;
    let storage = FileStorage::open(config.storage.data_dir.as_deref())?;
    tracing::debug!(data_dir = %storage.data_dir().display(), "storage opened");

    Ok(Session::new(catalog, FavoritesStore::new(storage)))
}
