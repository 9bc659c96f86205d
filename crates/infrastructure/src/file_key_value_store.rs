//! Directory-backed key/value store.
//!
//! Each key is one `<key>.json` file. Writes go to a temporary sibling and are
//! renamed into place, so readers in other processes never see a torn value.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hearthware_application::KeyValueStore;
use hearthware_core::{AppError, AppResult};
use uuid::Uuid;

/// Key/value store persisted under one directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|error| {
            AppError::Internal(format!(
                "failed to create storage directory '{}': {error}",
                root.display()
            ))
        })?;

        Ok(Self { root })
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'));
        if !valid {
            return Err(AppError::Validation(format!(
                "storage key '{key}' must be ascii letters, digits, '-' or '_'"
            )));
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AppError::Internal(format!(
                "failed to read '{}': {error}",
                path.display()
            ))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        let staging = self.root.join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));

        fs::write(&staging, value).map_err(|error| {
            AppError::Internal(format!("failed to write '{}': {error}", staging.display()))
        })?;
        fs::rename(&staging, &path).map_err(|error| {
            let _ = fs::remove_file(&staging);
            AppError::Internal(format!("failed to replace '{}': {error}", path.display()))
        })
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove '{}': {error}",
                path.display()
            ))),
        }
    }
}
