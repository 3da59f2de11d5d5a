//! In-memory catalog store.
//!
//! Holds both collections behind [`tokio::sync::RwLock`]s. Nothing
//! survives a restart, so this backend is never a system of record.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CatalogStore, StorageError};
use crate::domain::{Event, Participant};

/// Volatile catalog store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
    participants: RwLock<Vec<Participant>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given collections.
    #[must_use]
    pub fn seeded(events: Vec<Event>, participants: Vec<Participant>) -> Self {
        Self {
            events: RwLock::new(events),
            participants: RwLock::new(participants),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn load_events(&self) -> Result<Vec<Event>, StorageError> {
        Ok(self.events.read().await.clone())
    }

    async fn load_participants(&self) -> Result<Vec<Participant>, StorageError> {
        Ok(self.participants.read().await.clone())
    }

    async fn save_events(&self, events: &[Event]) -> Result<(), StorageError> {
        *self.events.write().await = events.to_vec();
        Ok(())
    }

    async fn save_participants(&self, participants: &[Participant]) -> Result<(), StorageError> {
        *self.participants.write().await = participants.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory (not persisted)".to_string()
    }
}
