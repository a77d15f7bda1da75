pub mod config;
pub mod error;
pub mod label;
pub mod state;

// Re-export common types
pub use error::{PlateWatchError, Result};
pub use label::{ALL_STATES, Label, STATE_COUNT};
pub use state::{EditBatch, PersistentKeyValueStore, Snapshot, UiModel, ViewedSet};
