pub mod config_service;
pub mod memory_store;
pub mod paths;
pub mod storage;
pub mod toml_file_store;

pub use crate::config_service::ConfigService;
pub use crate::memory_store::InMemoryStore;
pub use crate::paths::{PlateWatchPaths, ServiceType};
pub use crate::toml_file_store::TomlFileStore;
