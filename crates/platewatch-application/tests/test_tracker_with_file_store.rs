use std::sync::Arc;

use platewatch_application::{StateTracker, TrackerOptions};
use platewatch_core::{ALL_STATES, Label, PersistentKeyValueStore, STATE_COUNT};
use platewatch_infrastructure::TomlFileStore;
use tempfile::TempDir;

async fn open_tracker(dir: &TempDir) -> (Arc<TomlFileStore>, StateTracker) {
    let store = Arc::new(
        TomlFileStore::open(dir.path().join("states.toml"))
            .await
            .unwrap(),
    );
    let tracker = StateTracker::new(store.clone(), TrackerOptions::default())
        .await
        .unwrap();
    (store, tracker)
}

#[tokio::test]
async fn test_mark_then_undo_round_trips_for_every_label() {
    let temp_dir = TempDir::new().unwrap();
    let (store, tracker) = open_tracker(&temp_dir).await;

    // Start from a non-trivial state so the round trip is meaningful.
    for name in ["Alabama", "Texas", "Wyoming"] {
        tracker.mark_viewed_by_name(name).await.unwrap();
    }

    for label in Label::all() {
        let before = store.read().await.unwrap();

        tracker.mark_viewed(label).await.unwrap();
        let model = tracker.ui_model();
        assert!(model.viewed.contains(&label));
        assert!(!model.non_viewed.contains(&label));
        assert_eq!(model.viewed.len() + model.non_viewed.len(), STATE_COUNT);

        assert!(tracker.undo().await.unwrap());
        assert_eq!(store.read().await.unwrap(), before);
    }
}

#[tokio::test]
async fn test_progress_persists_but_history_does_not() {
    let temp_dir = TempDir::new().unwrap();

    {
        let (_store, tracker) = open_tracker(&temp_dir).await;
        tracker.mark_viewed_by_name("Texas").await.unwrap();
        tracker.mark_viewed_by_name("Maine").await.unwrap();
        assert!(tracker.ui_model().has_undo);
    }

    let (_store, tracker) = open_tracker(&temp_dir).await;
    let model = tracker.ui_model();
    let viewed: Vec<&str> = model.viewed.iter().map(|l| l.name()).collect();
    assert_eq!(viewed, vec!["Maine", "Texas"]);
    assert!(!model.has_undo);
    assert!(!tracker.undo().await.unwrap());
}

#[tokio::test]
async fn test_reset_clears_everything_and_is_undoable() {
    let temp_dir = TempDir::new().unwrap();
    let (_store, tracker) = open_tracker(&temp_dir).await;

    tracker.mark_viewed_by_name("Oregon").await.unwrap();
    tracker.mark_viewed_by_name("Nevada").await.unwrap();
    tracker.reset().await.unwrap();

    let model = tracker.ui_model();
    let non_viewed: Vec<&str> = model.non_viewed.iter().map(|l| l.name()).collect();
    assert_eq!(non_viewed, ALL_STATES.to_vec());
    assert!(model.viewed.is_empty());
    assert!(model.has_undo);

    tracker.undo().await.unwrap();
    assert_eq!(tracker.ui_model().seen_count(), 2);
}

#[tokio::test]
async fn test_reload_picks_up_another_writer() {
    let temp_dir = TempDir::new().unwrap();
    let (store, tracker) = open_tracker(&temp_dir).await;
    let mut feed = tracker.observe_ui_model();

    let other = TomlFileStore::open(temp_dir.path().join("states.toml"))
        .await
        .unwrap();
    other
        .edit_atomically(platewatch_core::EditBatch::new().set("Georgia", true))
        .await
        .unwrap();

    store.reload().await.unwrap();
    let model = feed.changed().await.unwrap();
    assert_eq!(model.seen_count(), 1);
    assert!(!model.has_undo);
}

#[tokio::test]
async fn test_undo_keeps_another_writers_earlier_change() {
    let temp_dir = TempDir::new().unwrap();
    let (store, tracker) = open_tracker(&temp_dir).await;

    let other = TomlFileStore::open(temp_dir.path().join("states.toml"))
        .await
        .unwrap();
    other
        .edit_atomically(platewatch_core::EditBatch::new().set("Georgia", true))
        .await
        .unwrap();

    // The undo step is the file as the write found it, Georgia included.
    tracker.mark_viewed_by_name("Texas").await.unwrap();
    assert!(tracker.undo().await.unwrap());

    let snapshot = store.read().await.unwrap();
    assert!(snapshot.get("Georgia"));
    assert!(!snapshot.get("Texas"));
}
