//! In-memory store implementation.

use async_trait::async_trait;
use platewatch_core::error::Result;
use platewatch_core::state::{EditBatch, PersistentKeyValueStore, Snapshot};
use tokio::sync::watch;

/// Store whose contents live only in process memory.
///
/// The watch channel is the storage: every write is a single
/// `send_if_modified`, which makes it atomic for readers and notifies
/// watchers only when the contents actually change.
#[derive(Debug)]
pub struct InMemoryStore {
    contents: watch::Sender<Snapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_contents(Snapshot::new())
    }

    pub fn with_contents(snapshot: Snapshot) -> Self {
        let (contents, _) = watch::channel(snapshot);
        Self { contents }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistentKeyValueStore for InMemoryStore {
    async fn read(&self) -> Result<Snapshot> {
        Ok(self.contents.borrow().clone())
    }

    async fn edit_atomically(&self, batch: EditBatch) -> Result<Snapshot> {
        let mut before = Snapshot::new();
        self.contents.send_if_modified(|current| {
            let next = current.with_batch(&batch);
            if next == *current {
                before = next;
                return false;
            }
            before = std::mem::replace(current, next);
            true
        });
        Ok(before)
    }

    async fn overwrite(&self, snapshot: Snapshot) -> Result<()> {
        self.contents.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<Snapshot> {
        self.contents.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_empty() {
        let store = InMemoryStore::new();
        assert!(store.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_and_overwrite() {
        let store = InMemoryStore::new();
        store
            .edit_atomically(EditBatch::new().set("Kansas", true).set("Ohio", true))
            .await
            .unwrap();
        let snapshot = store.read().await.unwrap();
        assert!(snapshot.get("Kansas"));
        assert!(snapshot.get("Ohio"));

        store.overwrite(Snapshot::new()).await.unwrap();
        assert!(store.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_returns_previous_contents() {
        let store = InMemoryStore::new();
        let before = store
            .edit_atomically(EditBatch::new().set("Oregon", true))
            .await
            .unwrap();
        assert!(before.is_empty());

        let before = store
            .edit_atomically(EditBatch::new().set("Oregon", false))
            .await
            .unwrap();
        assert!(before.get("Oregon"));
    }

    #[tokio::test]
    async fn test_watch_notifies_on_change_only() {
        let store = InMemoryStore::new();
        let mut rx = store.watch();
        assert!(!rx.has_changed().unwrap());

        store
            .edit_atomically(EditBatch::new().set("Utah", true))
            .await
            .unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().get("Utah"));

        store
            .edit_atomically(EditBatch::new().set("Utah", true))
            .await
            .unwrap();
        assert!(!rx.has_changed().unwrap());
    }
}
