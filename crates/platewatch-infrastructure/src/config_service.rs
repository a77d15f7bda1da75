//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml`, creating the file with
//! defaults on first run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use platewatch_core::config::RootConfig;
use platewatch_core::error::{PlateWatchError, Result};

use crate::paths::{PlateWatchPaths, ServiceType};
use crate::storage::AtomicTomlFile;

/// Loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<RootConfig>>,
    /// Cached configuration; `None` until first access.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Uses `config.toml` under the given paths.
    pub fn new(paths: &PlateWatchPaths) -> Result<Self> {
        Ok(Self::with_path(paths.get_path(ServiceType::Config)?))
    }

    /// Uses an explicit config file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Gets the root configuration, loading it from file if not cached.
    ///
    /// A missing file is created with the default configuration. A file
    /// that fails to parse is an error; it is never overwritten.
    pub fn get_config(&self) -> Result<RootConfig> {
        if let Some(cached) = self.read_cache()? {
            return Ok(cached);
        }

        let loaded = match self.file.load()? {
            Some(config) => config,
            None => {
                let default_config = RootConfig::default();
                self.file.replace(&default_config)?;
                tracing::info!("[ConfigService] Wrote default config to {:?}", self.path());
                default_config
            }
        };

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| PlateWatchError::internal(format!("Config cache poisoned: {}", e)))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    fn read_cache(&self) -> Result<Option<RootConfig>> {
        let read_lock = self
            .config
            .read()
            .map_err(|e| PlateWatchError::internal(format!("Config cache poisoned: {}", e)))?;
        Ok(read_lock.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platewatch_core::config::StoreBackend;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlateWatchPaths::new(Some(temp_dir.path().to_path_buf()));
        let service = ConfigService::new(&paths).unwrap();

        let config = service.get_config().unwrap();
        assert_eq!(config, RootConfig::default());
        assert!(temp_dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_reads_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[store]\nbackend = \"memory\"\n").unwrap();

        let service = ConfigService::with_path(path);
        assert_eq!(service.get_config().unwrap().store.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_config_is_cached_after_first_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(path.clone());
        assert_eq!(service.get_config().unwrap().tracker.undo_limit, None);

        std::fs::write(&path, "[tracker]\nundo_limit = 3\n").unwrap();
        assert_eq!(service.get_config().unwrap().tracker.undo_limit, None);

        let fresh = ConfigService::with_path(path);
        assert_eq!(fresh.get_config().unwrap().tracker.undo_limit, Some(3));
    }

    #[test]
    fn test_broken_file_is_reported_not_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[store\n").unwrap();

        let service = ConfigService::with_path(path.clone());
        assert!(service.get_config().is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[store\n");
    }
}
