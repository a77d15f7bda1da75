//! Viewed-state tracker with undo.
//!
//! [`StateTracker`] owns the undo history and is the only writer the UI talks
//! to. Each mutating operation runs as one critical section: take the
//! history lock, write (the store hands back the contents it replaced, read
//! in the same transaction), record that snapshot, publish the new
//! [`UiModel`], release. Two operations fired back to back (a double tap,
//! say) therefore never interleave their snapshot and write steps.

use std::sync::Arc;

use platewatch_core::error::Result;
use platewatch_core::{EditBatch, Label, PersistentKeyValueStore, Snapshot, UiModel};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::history::UndoHistory;

/// Tuning knobs for a [`StateTracker`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Maximum number of undo steps kept. `None` keeps every step; `Some(0)`
    /// disables undo.
    pub undo_limit: Option<usize>,
}

/// Live feed of the [`UiModel`].
///
/// Holds only the latest value; a slow reader skips intermediate models.
/// Each feed is independent, so dropping one never affects the others.
#[derive(Debug, Clone)]
pub struct UiModelFeed {
    rx: watch::Receiver<UiModel>,
}

impl UiModelFeed {
    /// The most recent model.
    pub fn current(&self) -> UiModel {
        self.rx.borrow().clone()
    }

    /// Waits for a model newer than the last one seen through this feed.
    ///
    /// Returns `None` once the tracker is gone.
    pub async fn changed(&mut self) -> Option<UiModel> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

/// Tracks which labels have been seen, with single-step undo.
///
/// Must be created inside a tokio runtime: construction spawns a task that
/// republishes the model whenever the store changes underneath us.
pub struct StateTracker {
    store: Arc<dyn PersistentKeyValueStore>,
    history: Arc<Mutex<UndoHistory>>,
    ui_model: Arc<watch::Sender<UiModel>>,
    forwarder: JoinHandle<()>,
}

impl StateTracker {
    pub async fn new(
        store: Arc<dyn PersistentKeyValueStore>,
        options: TrackerOptions,
    ) -> Result<Self> {
        // Subscribe before reading so a write landing in between still
        // reaches the forwarder.
        let changes = store.watch();
        let initial = store.read().await?;

        let (sender, _) = watch::channel(UiModel::from_snapshot(&initial, false));
        let ui_model = Arc::new(sender);
        let history = Arc::new(Mutex::new(UndoHistory::new(options.undo_limit)));

        let forwarder = tokio::spawn(forward_store_changes(
            changes,
            history.clone(),
            ui_model.clone(),
        ));

        tracing::info!(
            "[StateTracker] Started with {} of {} labels viewed",
            ui_model.borrow().seen_count(),
            platewatch_core::STATE_COUNT
        );

        Ok(Self {
            store,
            history,
            ui_model,
            forwarder,
        })
    }

    /// Marks `label` viewed. Always records an undo step, even when the
    /// label was already viewed.
    pub async fn mark_viewed(&self, label: Label) -> Result<()> {
        tracing::info!("[StateTracker] mark_viewed({})", label);
        self.mutate(EditBatch::single(label, true)).await
    }

    /// Marks `label` not viewed. Always records an undo step.
    pub async fn mark_unviewed(&self, label: Label) -> Result<()> {
        tracing::info!("[StateTracker] mark_unviewed({})", label);
        self.mutate(EditBatch::single(label, false)).await
    }

    /// Like [`mark_viewed`](Self::mark_viewed), for an unchecked name.
    ///
    /// Fails with `InvalidLabel` unless `name` is exactly one of the 50 states.
    pub async fn mark_viewed_by_name(&self, name: &str) -> Result<()> {
        self.mark_viewed(name.parse()?).await
    }

    /// Like [`mark_unviewed`](Self::mark_unviewed), for an unchecked name.
    pub async fn mark_unviewed_by_name(&self, name: &str) -> Result<()> {
        self.mark_unviewed(name.parse()?).await
    }

    /// Clears every flag in one transaction. Undoable.
    pub async fn reset(&self) -> Result<()> {
        tracing::info!("[StateTracker] reset()");
        self.mutate(EditBatch::clear_all()).await
    }

    /// Restores the store to the most recent snapshot.
    ///
    /// Returns `Ok(false)` without touching anything when there is nothing
    /// to undo. There is no redo.
    pub async fn undo(&self) -> Result<bool> {
        let mut history = self.history.lock().await;

        let Some(snapshot) = history.pop() else {
            tracing::debug!("[StateTracker] undo() with empty history ignored");
            return Ok(false);
        };

        tracing::info!("[StateTracker] undo() ({} steps left)", history.len());

        if let Err(err) = self.store.overwrite(snapshot.clone()).await {
            tracing::warn!("[StateTracker] undo failed, history kept: {}", err);
            history.restore(snapshot);
            return Err(err);
        }

        self.publish(&history);
        Ok(true)
    }

    /// Subscribes to the live model. The feed starts at the current model.
    pub fn observe_ui_model(&self) -> UiModelFeed {
        UiModelFeed {
            rx: self.ui_model.subscribe(),
        }
    }

    /// Re-reads the store and republishes the model.
    ///
    /// Picks up writes made by other processes, which a file store only
    /// sees when it is read again.
    pub async fn refresh(&self) -> Result<UiModel> {
        let history = self.history.lock().await;
        let snapshot = self.store.read().await?;
        publish_model(&self.ui_model, &snapshot, !history.is_empty());
        Ok(self.ui_model())
    }

    /// The current model.
    pub fn ui_model(&self) -> UiModel {
        self.ui_model.borrow().clone()
    }

    /// Number of undo steps available.
    pub async fn undo_depth(&self) -> usize {
        self.history.lock().await.len()
    }

    async fn mutate(&self, batch: EditBatch) -> Result<()> {
        let mut history = self.history.lock().await;

        let before = match self.store.edit_atomically(batch).await {
            Ok(before) => before,
            Err(err) => {
                tracing::warn!("[StateTracker] write failed, no undo step recorded: {}", err);
                return Err(err);
            }
        };
        if history.push(before).is_some() {
            tracing::debug!("[StateTracker] Oldest undo step dropped");
        }

        self.publish(&history);
        Ok(())
    }

    /// Recomputes the model from the store's latest contents. Callers hold
    /// the history lock.
    fn publish(&self, history: &UndoHistory) {
        let snapshot = self.store.watch().borrow().clone();
        publish_model(&self.ui_model, &snapshot, !history.is_empty());
    }
}

impl Drop for StateTracker {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}

fn publish_model(sender: &watch::Sender<UiModel>, snapshot: &Snapshot, has_undo: bool) {
    let next = UiModel::from_snapshot(snapshot, has_undo);
    let changed = sender.send_if_modified(|current| {
        if *current == next {
            return false;
        }
        *current = next;
        true
    });
    if changed {
        tracing::debug!("[StateTracker] UiModel republished (has_undo: {})", has_undo);
    }
}

/// Republishes the model after writes that did not go through the tracker.
async fn forward_store_changes(
    mut changes: watch::Receiver<Snapshot>,
    history: Arc<Mutex<UndoHistory>>,
    ui_model: Arc<watch::Sender<UiModel>>,
) {
    while changes.changed().await.is_ok() {
        let guard = history.lock().await;
        let snapshot = changes.borrow_and_update().clone();
        publish_model(&ui_model, &snapshot, !guard.is_empty());
    }
}
