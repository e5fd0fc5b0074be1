//! Alias snapshot persistence
//!
//! The cache is persisted as an ordered list of `[address, alias]` pairs under
//! a fixed storage key.

use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Storage key of the alias snapshot
pub const ALIAS_STORAGE_KEY: &str = "tezos-domains";

/// Durable snapshot storage for the alias cache
pub trait AliasStore: Send + Sync {
    /// Load the snapshot stored under `key`; empty when nothing was stored yet
    fn load(&self, key: &str) -> Result<Vec<(String, String)>>;

    /// Replace the snapshot stored under `key`
    fn save(&self, key: &str, entries: &[(String, String)]) -> Result<()>;
}

/// Snapshot store writing one JSON file per key.
///
/// Clones share one write lock, so saves through any clone never interleave
/// on the temporary file.
#[derive(Debug, Clone)]
pub struct JsonFileAliasStore {
    dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileAliasStore {
    /// Store files under `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Directory holding the snapshots
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(Error::Storage(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl AliasStore for JsonFileAliasStore {
    fn load(&self, key: &str) -> Result<Vec<(String, String)>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, key: &str, entries: &[(String, String)]) -> Result<()> {
        let path = self.path_for(key)?;
        let body = serde_json::to_vec(entries)?;
        let _guard = self.write_lock.lock();
        fs::create_dir_all(&self.dir)?;

        // Write-then-rename so a crash never leaves a truncated snapshot
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory snapshot store
#[derive(Debug, Default)]
pub struct MemoryAliasStore {
    snapshots: Mutex<HashMap<String, Vec<(String, String)>>>,
    saves: AtomicUsize,
}

impl MemoryAliasStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store pre-seeded with a snapshot
    pub fn with_snapshot(key: &str, entries: Vec<(String, String)>) -> Self {
        let store = Self::new();
        store.snapshots.lock().insert(key.to_string(), entries);
        store
    }

    /// Number of `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Acquire)
    }
}

impl AliasStore for MemoryAliasStore {
    fn load(&self, key: &str) -> Result<Vec<(String, String)>> {
        Ok(self.snapshots.lock().get(key).cloned().unwrap_or_default())
    }

    fn save(&self, key: &str, entries: &[(String, String)]) -> Result<()> {
        self.snapshots.lock().insert(key.to_string(), entries.to_vec());
        self.saves.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
