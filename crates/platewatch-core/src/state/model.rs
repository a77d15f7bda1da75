//! Viewed-state domain models.
//!
//! A [`Snapshot`] is exactly what the store holds. A [`ViewedSet`] is that
//! snapshot seen through the fixed label list, and an [`EditBatch`] is a
//! group of writes the store must apply all together or not at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::label::{Label, STATE_COUNT};

/// Immutable full copy of the store contents at one point in time.
///
/// Keys that are not state names are kept as-is so that restoring a
/// snapshot reproduces the store exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, bool>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`, `false` when absent.
    pub fn get(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.entries.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }

    /// Applies every write in `batch`, in order.
    pub fn apply(&mut self, batch: &EditBatch) {
        for (key, value) in batch.writes() {
            self.entries.insert(key.clone(), *value);
        }
    }

    /// Returns a copy of this snapshot with `batch` applied.
    pub fn with_batch(&self, batch: &EditBatch) -> Snapshot {
        let mut next = self.clone();
        next.apply(batch);
        next
    }
}

impl FromIterator<(String, bool)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// An ordered group of key/boolean writes applied as one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBatch {
    writes: Vec<(String, bool)>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a write to the batch (builder style).
    pub fn set(mut self, key: impl Into<String>, value: bool) -> Self {
        self.writes.push((key.into(), value));
        self
    }

    /// A batch writing one label's flag.
    pub fn single(label: Label, viewed: bool) -> Self {
        Self::new().set(label.name(), viewed)
    }

    /// A batch clearing the flag of every label.
    pub fn clear_all() -> Self {
        Label::all().fold(Self::new(), |batch, label| batch.set(label.name(), false))
    }

    pub fn writes(&self) -> &[(String, bool)] {
        &self.writes
    }
}

/// The viewed flag of every label, read from a snapshot.
///
/// The domain is always the 50 fixed labels, whatever keys the snapshot
/// happens to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewedSet {
    flags: [bool; STATE_COUNT],
}

impl ViewedSet {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut flags = [false; STATE_COUNT];
        for label in Label::all() {
            flags[label.index()] = snapshot.get(label.name());
        }
        Self { flags }
    }

    pub fn is_viewed(&self, label: Label) -> bool {
        self.flags[label.index()]
    }

    /// Splits the labels into `(non_viewed, viewed)`, both in master order.
    pub fn partition(&self) -> (Vec<Label>, Vec<Label>) {
        let mut non_viewed = Vec::with_capacity(STATE_COUNT);
        let mut viewed = Vec::new();
        for label in Label::all() {
            if self.is_viewed(label) {
                viewed.push(label);
            } else {
                non_viewed.push(label);
            }
        }
        (non_viewed, viewed)
    }
}

impl Default for ViewedSet {
    fn default() -> Self {
        Self::from_snapshot(&Snapshot::new())
    }
}
