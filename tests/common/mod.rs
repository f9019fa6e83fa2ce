#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use expense_core::{
    errors::StorageError,
    ledger::ExpenseLedger,
    storage::{JsonFileStore, KeyValueStore, MemoryStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a file store rooted in a fresh temporary directory.
pub fn temp_file_store() -> JsonFileStore {
    let temp = TempDir::new().expect("create temp dir");
    let root = temp.path().join("data");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    JsonFileStore::new(root).expect("create json file store")
}

/// Opens a ledger over a shared in-memory store so tests can reopen it.
pub fn memory_ledger() -> (ExpenseLedger, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let ledger = ExpenseLedger::builder(Box::new(Arc::clone(&store))).open();
    (ledger, store)
}

/// Store whose writes can be switched off to simulate a full or read-only disk.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: Mutex<bool>,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().expect("lock failing flag") = failing;
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if *self.failing.lock().expect("lock failing flag") {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        self.inner.set(key, value)
    }
}
