pub mod model;
pub mod store;
pub mod ui_model;

pub use model::{EditBatch, Snapshot, ViewedSet};
pub use store::PersistentKeyValueStore;
pub use ui_model::UiModel;
