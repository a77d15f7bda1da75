//! Atomic TOML file operations.
//!
//! Writes go to a temporary sibling file which is synced and then renamed
//! over the target, so readers never see a half-written document.
//! Read-modify-write cycles hold an exclusive lock on a `.lock` sibling.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use platewatch_core::error::{PlateWatchError, Result};
use serde::{Serialize, de::DeserializeOwned};

/// A handle to a TOML document on disk holding one `T`.
#[derive(Debug, Clone)]
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the document.
    ///
    /// Returns `Ok(None)` when the file is missing or blank.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Replaces the document under the lock.
    pub fn replace(&self, data: &T) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write_atomically(data)
    }

    /// Loads the document (or `default_value`), lets `f` modify it and
    /// writes it back, all while holding the lock.
    ///
    /// Returns the value that was written.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<T>
    where
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data);
        self.write_atomically(&data)?;

        Ok(data)
    }

    fn write_atomically(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| PlateWatchError::io(format!("No file name in {:?}", self.path)))?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// Exclusive advisory lock, released when dropped.
///
/// The lock file itself is left in place: unlinking it would let a waiter
/// lock a stale inode while a newcomer locks a fresh one.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        FileExt::lock_exclusive(&file)
            .map_err(|e| PlateWatchError::io(format!("Failed to lock {:?}: {}", lock_path, e)))?;

        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platewatch_core::{EditBatch, Snapshot};
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Snapshot>::new(temp_dir.path().join("states.toml"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_load_blank_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("states.toml");
        fs::write(&path, "  \n").unwrap();
        let file = AtomicTomlFile::<Snapshot>::new(path);
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_update_applies_on_top_of_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Snapshot>::new(temp_dir.path().join("states.toml"));

        file.update(Snapshot::new(), |s| s.set("Iowa", true)).unwrap();
        let written = file
            .update(Snapshot::new(), |s| {
                s.apply(&EditBatch::new().set("Idaho", true))
            })
            .unwrap();

        assert!(written.get("Iowa"));
        assert!(written.get("Idaho"));
        assert_eq!(file.load().unwrap(), Some(written));
    }

    #[test]
    fn test_replace_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("states.toml");
        let file = AtomicTomlFile::<Snapshot>::new(path.clone());

        let mut snapshot = Snapshot::new();
        snapshot.set("Oregon", true);
        file.replace(&snapshot).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join(".states.toml.tmp").exists());
        assert_eq!(file.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_corrupt_file_is_a_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("states.toml");
        fs::write(&path, "Texas = maybe").unwrap();
        let file = AtomicTomlFile::<Snapshot>::new(path);

        let err = file.load().unwrap_err();
        assert!(matches!(err, PlateWatchError::Serialization { .. }));
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("states.toml");
        let file = AtomicTomlFile::<Snapshot>::new(path.clone());

        file.replace(&Snapshot::new()).unwrap();
        assert!(path.exists());
    }
}
