//! Wiring of config, store and tracker.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use platewatch_application::{StateTracker, TrackerOptions};
use platewatch_core::PersistentKeyValueStore;
use platewatch_core::config::{RootConfig, StoreBackend};
use platewatch_infrastructure::{InMemoryStore, PlateWatchPaths, ServiceType, TomlFileStore};

/// Store selection coming from the command line.
#[derive(Debug, Clone, Default)]
pub struct StoreOverrides {
    pub path: Option<PathBuf>,
    pub memory: bool,
}

/// Opens the store the user asked for.
///
/// `--memory` beats `--store`, which beats the config file.
pub async fn open_store(
    overrides: &StoreOverrides,
    config: &RootConfig,
    paths: &PlateWatchPaths,
) -> Result<Arc<dyn PersistentKeyValueStore>> {
    if overrides.memory {
        tracing::info!("[Bootstrap] Using in-memory store (--memory)");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    let path = match (&overrides.path, config.store.backend) {
        (Some(path), _) => path.clone(),
        (None, StoreBackend::Memory) => {
            tracing::info!("[Bootstrap] Using in-memory store (config)");
            return Ok(Arc::new(InMemoryStore::new()));
        }
        (None, StoreBackend::File) => match &config.store.path {
            Some(path) => path.clone(),
            None => paths.get_path(ServiceType::States)?,
        },
    };

    tracing::info!("[Bootstrap] Using file store at {:?}", path);
    Ok(Arc::new(TomlFileStore::open(path).await?))
}

pub async fn build_tracker(
    overrides: &StoreOverrides,
    config: &RootConfig,
    paths: &PlateWatchPaths,
) -> Result<StateTracker> {
    let store = open_store(overrides, config, paths).await?;
    let options = TrackerOptions {
        undo_limit: config.tracker.undo_limit,
    };
    Ok(StateTracker::new(store, options).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use platewatch_core::EditBatch;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> PlateWatchPaths {
        PlateWatchPaths::new(Some(dir.path().to_path_buf()))
    }

    #[tokio::test]
    async fn test_default_is_file_store_under_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&StoreOverrides::default(), &RootConfig::default(), &paths(&temp_dir))
            .await
            .unwrap();

        store
            .edit_atomically(EditBatch::new().set("Texas", true))
            .await
            .unwrap();
        assert!(temp_dir.path().join("states.toml").exists());
    }

    #[tokio::test]
    async fn test_memory_flag_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let overrides = StoreOverrides {
            path: Some(temp_dir.path().join("ignored.toml")),
            memory: true,
        };
        let store = open_store(&overrides, &RootConfig::default(), &paths(&temp_dir))
            .await
            .unwrap();

        store
            .edit_atomically(EditBatch::new().set("Texas", true))
            .await
            .unwrap();
        assert!(!temp_dir.path().join("ignored.toml").exists());
        assert!(!temp_dir.path().join("states.toml").exists());
    }

    #[tokio::test]
    async fn test_store_flag_beats_memory_backend_in_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = RootConfig::default();
        config.store.backend = StoreBackend::Memory;
        let overrides = StoreOverrides {
            path: Some(temp_dir.path().join("custom.toml")),
            memory: false,
        };

        let tracker = build_tracker(&overrides, &config, &paths(&temp_dir))
            .await
            .unwrap();
        tracker.mark_viewed_by_name("Maine").await.unwrap();
        assert!(temp_dir.path().join("custom.toml").exists());
    }
}
