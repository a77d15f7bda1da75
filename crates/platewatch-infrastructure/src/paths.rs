//! Unified path management for PlateWatch files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/platewatch/        # Config directory (platform dependent)
//! ├── config.toml              # Application configuration
//! ├── states.toml              # Viewed flags (file store)
//! └── logs/                    # Application logs
//!     └── platewatch.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

use platewatch_core::error::{PlateWatchError, Result};

const APP_DIR_NAME: &str = "platewatch";

/// The files PlateWatch reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    States,
    Logs,
}

/// Resolves every PlateWatch path from one base directory.
///
/// `PlateWatchPaths::new(None)` uses the platform config directory
/// (`~/.config/platewatch` on Linux); passing a base relocates everything,
/// which is what tests do.
#[derive(Debug, Clone)]
pub struct PlateWatchPaths {
    base_override: Option<PathBuf>,
}

impl PlateWatchPaths {
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    /// Returns the configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_override {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| PlateWatchError::config("Cannot find the platform config directory"))
    }

    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf> {
        let dir = self.config_dir()?;
        Ok(match service {
            ServiceType::Config => dir.join("config.toml"),
            ServiceType::States => dir.join("states.toml"),
            ServiceType::Logs => dir.join("logs"),
        })
    }
}

impl Default for PlateWatchPaths {
    fn default() -> Self {
        Self::new(None)
    }
}
