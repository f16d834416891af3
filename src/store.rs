use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::error::Result;

/// Synchronous string-keyed blob store. Every value is a JSON document
/// rewritten wholesale on mutation; callers never see partial writes.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store, used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: the whole map is one JSON object on disk, rewritten
/// through a temp file + rename so a crash never leaves a torn file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create store directory {}", parent.display()))?;
            }
        }
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("read store file {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| {
                format!(
                    "store file {} is corrupted; delete it to reset",
                    path.display()
                )
            })?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "store opened");
        Ok(Self { path, entries })
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.entries).context("serialize store")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).with_context(|| format!("write store file {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace store file {}", self.path.display()))?;
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
