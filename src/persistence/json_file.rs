//! JSON file implementation of the catalog store.
//!
//! Each collection lives in its own pretty-printed JSON array. Writes go to
//! a sibling temp file that is synced and then renamed over the target, so
//! readers never observe a half-written collection.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use super::{CatalogStore, StorageError};
use crate::domain::{Event, Participant};

/// File name of the event collection inside the data directory.
pub const EVENTS_FILE: &str = "events.json";

/// File name of the participant collection inside the data directory.
pub const PARTICIPANTS_FILE: &str = "participants.json";

/// File-backed catalog store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    events_path: PathBuf,
    participants_path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for `<data_dir>/events.json` and
    /// `<data_dir>/participants.json`. Nothing is touched on disk until the
    /// first save.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            events_path: data_dir.join(EVENTS_FILE),
            participants_path: data_dir.join(PARTICIPANTS_FILE),
            data_dir,
        }
    }

    /// Returns the path of the event collection.
    #[must_use]
    pub fn events_path(&self) -> &Path {
        &self.events_path
    }

    /// Returns the path of the participant collection.
    #[must_use]
    pub fn participants_path(&self) -> &Path {
        &self.participants_path
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    async fn load_events(&self) -> Result<Vec<Event>, StorageError> {
        read_collection(&self.events_path).await
    }

    async fn load_participants(&self) -> Result<Vec<Participant>, StorageError> {
        read_collection(&self.participants_path).await
    }

    async fn save_events(&self, events: &[Event]) -> Result<(), StorageError> {
        write_collection(&self.events_path, events).await
    }

    async fn save_participants(&self, participants: &[Participant]) -> Result<(), StorageError> {
        write_collection(&self.participants_path, participants).await
    }

    fn describe(&self) -> String {
        format!("json files in {}", self.data_dir.display())
    }
}

/// Reads a JSON array from `path`. A missing or blank file is an empty
/// collection.
async fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically replaces `path` with the pretty-printed JSON of `items`.
async fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(items).map_err(StorageError::Encode)?;
    let write_err = |source: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = temp_path_for(path);
    let result = async {
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(&body).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp_path, path).await
    }
    .await;

    if let Err(source) = result {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(source));
    }

    tracing::debug!(path = %path.display(), items = items.len(), "collection written");
    Ok(())
}

/// Unique hidden sibling of `path` used as the staging file for a write.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()))
}
