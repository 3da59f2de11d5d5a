//! Persistence layer: whole-collection storage of events and participants.
//!
//! The [`CatalogStore`] trait is the only contract the registration
//! service relies on. [`JsonFileStore`] is the system of record;
//! [`MemoryStore`] backs tests and throwaway runs.

pub mod json_file;
pub mod memory;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{Event, Participant};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Failure at the catalog store boundary.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The backing file could not be written or replaced.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The backing file does not contain a valid collection.
    #[error("corrupt collection in {}: {source}", path.display())]
    Corrupt {
        /// File that failed.
        path: PathBuf,
        /// Parse error.
        source: serde_json::Error,
    },

    /// A collection could not be serialized.
    #[error("failed to encode collection: {0}")]
    Encode(serde_json::Error),
}

/// Durable whole-collection storage for the catalog.
///
/// Loads return the full collection (empty if nothing was stored yet).
/// Saves replace the full collection atomically: a concurrent reader sees
/// either the previous or the new collection, never a partial one.
#[async_trait]
pub trait CatalogStore: Send + Sync + fmt::Debug {
    /// Loads every stored event.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the storage is unreadable or corrupt.
    async fn load_events(&self) -> Result<Vec<Event>, StorageError>;

    /// Loads every stored participant.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the storage is unreadable or corrupt.
    async fn load_participants(&self) -> Result<Vec<Participant>, StorageError>;

    /// Replaces the stored event collection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the collection could not be written.
    async fn save_events(&self, events: &[Event]) -> Result<(), StorageError>;

    /// Replaces the stored participant collection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the collection could not be written.
    async fn save_participants(&self, participants: &[Participant]) -> Result<(), StorageError>;

    /// Short description of the backend for startup logs.
    fn describe(&self) -> String;
}
