//! Persistent key-value store trait.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::Result;
use crate::state::model::{EditBatch, Snapshot};

/// Storage for the per-label viewed flags.
///
/// Keys are strings, values booleans, absent keys read as `false`. Every
/// write is atomic: readers observe either the whole batch or none of it.
#[async_trait]
pub trait PersistentKeyValueStore: Send + Sync {
    /// Returns the full current contents.
    async fn read(&self) -> Result<Snapshot>;

    /// Applies all writes in `batch` as one all-or-nothing transaction.
    ///
    /// Returns the contents the batch was applied to, read inside the same
    /// transaction, so no other writer can slip in between.
    async fn edit_atomically(&self, batch: EditBatch) -> Result<Snapshot>;

    /// Replaces the entire contents with `snapshot`.
    async fn overwrite(&self, snapshot: Snapshot) -> Result<()>;

    /// Live feed of the store contents.
    ///
    /// The receiver starts at the current contents and is notified after
    /// every successful write, whoever issued it.
    fn watch(&self) -> watch::Receiver<Snapshot>;
}
