//! Small persistent key/value store for UI preferences such as the expanded
//! course in the list view. Every operation is best-effort: a store that cannot
//! be read or written behaves as empty and never fails the caller.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

pub trait LocalStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Store backed by a flat YAML mapping on disk. The file is read once on open
/// and rewritten after every change.
#[derive(Debug)]
pub struct YamlFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl YamlFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_yaml_ng::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring unreadable store");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        let result = serde_yaml_ng::to_string(&self.values)
            .map_err(|e| e.to_string())
            .and_then(|text| {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent).map_err(|e| e.to_string())?;
                }
                fs::write(&self.path, text).map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "could not write store");
        }
    }
}

impl LocalStore for YamlFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.persist();
        }
    }
}
