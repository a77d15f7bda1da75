//! File-backed store implementation.
//!
//! Persists the viewed flags as a flat TOML table:
//!
//! ```toml
//! "New York" = true
//! Texas = false
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use platewatch_core::error::{PlateWatchError, Result};
use platewatch_core::state::{EditBatch, PersistentKeyValueStore, Snapshot};
use tokio::sync::{Mutex, watch};

use crate::storage::AtomicTomlFile;

/// Store backed by a single TOML file.
///
/// The last known contents are kept in a watch channel so that observers
/// get a live feed. Writes from this process update the feed directly;
/// writes from other processes become visible on the next [`read`] or
/// [`reload`].
///
/// [`read`]: PersistentKeyValueStore::read
/// [`reload`]: TomlFileStore::reload
#[derive(Debug)]
pub struct TomlFileStore {
    file: Arc<AtomicTomlFile<Snapshot>>,
    contents: watch::Sender<Snapshot>,
    /// Keeps the write and the feed update of one call together.
    write_lock: Mutex<()>,
}

impl TomlFileStore {
    /// Opens the store at `path`, loading whatever is already there.
    ///
    /// A missing or empty file is an empty store; nothing is written until
    /// the first edit.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let file = Arc::new(AtomicTomlFile::new(path.into()));
        let initial = Self::load(file.clone()).await?;

        tracing::info!(
            "[TomlFileStore] Opened {:?} ({} entries)",
            file.path(),
            initial.len()
        );

        let (contents, _) = watch::channel(initial);
        Ok(Self {
            file,
            contents,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Re-reads the file and publishes its contents if they changed.
    pub async fn reload(&self) -> Result<Snapshot> {
        let _guard = self.write_lock.lock().await;
        let snapshot = Self::load(self.file.clone()).await?;
        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    fn publish(&self, snapshot: Snapshot) {
        self.contents.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }

    async fn load(file: Arc<AtomicTomlFile<Snapshot>>) -> Result<Snapshot> {
        tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| PlateWatchError::internal(format!("Failed to join task: {}", e)))?
            .map(Option::unwrap_or_default)
            .map_err(into_store_error)
    }
}

fn into_store_error(err: PlateWatchError) -> PlateWatchError {
    match err {
        PlateWatchError::Store(_) => err,
        other => PlateWatchError::store(other.to_string()),
    }
}

#[async_trait]
impl PersistentKeyValueStore for TomlFileStore {
    async fn read(&self) -> Result<Snapshot> {
        self.reload().await
    }

    async fn edit_atomically(&self, batch: EditBatch) -> Result<Snapshot> {
        let _guard = self.write_lock.lock().await;

        let file = self.file.clone();
        let (before, written) = tokio::task::spawn_blocking(move || {
            let mut before = Snapshot::new();
            let written = file.update(Snapshot::new(), |snapshot| {
                before = snapshot.clone();
                snapshot.apply(&batch);
            })?;
            Ok::<_, PlateWatchError>((before, written))
        })
        .await
        .map_err(|e| PlateWatchError::internal(format!("Failed to join task: {}", e)))?
        .map_err(into_store_error)?;

        tracing::debug!("[TomlFileStore] Edit committed ({} entries)", written.len());
        self.publish(written);
        Ok(before)
    }

    async fn overwrite(&self, snapshot: Snapshot) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let file = self.file.clone();
        let to_write = snapshot.clone();
        tokio::task::spawn_blocking(move || file.replace(&to_write))
            .await
            .map_err(|e| PlateWatchError::internal(format!("Failed to join task: {}", e)))?
            .map_err(into_store_error)?;

        tracing::debug!("[TomlFileStore] Overwrite committed ({} entries)", snapshot.len());
        self.publish(snapshot);
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<Snapshot> {
        self.contents.subscribe()
    }
}
