//! The derived model handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::label::{Label, STATE_COUNT};
use crate::state::model::{Snapshot, ViewedSet};

/// What a screen needs to draw the checklist.
///
/// Never stored; rebuilt whenever the store contents or the undo history
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiModel {
    /// Labels not yet seen, in master order.
    pub non_viewed: Vec<Label>,
    /// Labels already seen, in master order.
    pub viewed: Vec<Label>,
    /// Whether an undo step is available.
    pub has_undo: bool,
}

impl UiModel {
    pub fn from_viewed_set(set: &ViewedSet, has_undo: bool) -> Self {
        let (non_viewed, viewed) = set.partition();
        Self {
            non_viewed,
            viewed,
            has_undo,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot, has_undo: bool) -> Self {
        Self::from_viewed_set(&ViewedSet::from_snapshot(snapshot), has_undo)
    }

    pub fn seen_count(&self) -> usize {
        self.viewed.len()
    }

    pub fn total(&self) -> usize {
        STATE_COUNT
    }

    pub fn is_complete(&self) -> bool {
        self.non_viewed.is_empty()
    }
}

impl Default for UiModel {
    /// Nothing seen, no undo.
    fn default() -> Self {
        Self::from_snapshot(&Snapshot::new(), false)
    }
}
