pub mod history;
pub mod tracker;

pub use history::UndoHistory;
pub use tracker::{StateTracker, TrackerOptions, UiModelFeed};
