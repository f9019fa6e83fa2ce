use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{errors::StorageError, utils};

use super::{KeyValueStore, Result};

const BLOB_EXTENSION: &str = "json";

/// Filesystem-backed store keeping one JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let name = canonical_name(key)?;
        Ok(self.root.join(format!("{}.{}", name, BLOB_EXTENSION)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        utils::fs::write_atomic(&path, value)?;
        Ok(())
    }
}

/// Maps a key onto a safe file stem. Dots and dashes survive so versioned keys stay readable.
fn canonical_name(key: &str) -> Result<String> {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '.' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(['_', '.']).is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(sanitized)
}
