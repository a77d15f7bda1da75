//! Undo history of whole-store snapshots.

use std::collections::VecDeque;

use platewatch_core::Snapshot;

/// Stack of snapshots, most recent last.
///
/// With a limit set, pushing onto a full history drops the oldest entry.
#[derive(Debug, Clone, Default)]
pub struct UndoHistory {
    snapshots: VecDeque<Snapshot>,
    limit: Option<usize>,
}

impl UndoHistory {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            snapshots: VecDeque::new(),
            limit,
        }
    }

    /// Pushes a snapshot, returning the entry evicted to respect the limit.
    ///
    /// With a limit of zero nothing is stored and nothing is evicted.
    pub fn push(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        match self.limit {
            Some(0) => None,
            Some(limit) => {
                self.snapshots.push_back(snapshot);
                if self.snapshots.len() > limit {
                    self.snapshots.pop_front()
                } else {
                    None
                }
            }
            None => {
                self.snapshots.push_back(snapshot);
                None
            }
        }
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    /// Puts a popped snapshot back on top.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.snapshots.push_back(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
