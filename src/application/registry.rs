//! # Registry Store
//!
//! Loads and saves the user registry (`data/users.json`).
//! Writers go through `RegistryStore::begin`, which holds a single writer lock from load to
//! commit so concurrent load-mutate-save sequences cannot clobber each other.
//! Commits write a sibling temp file and rename it over the target.

use crate::domain::types::Registry;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::ErrorKind;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};

pub struct RegistryStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the last committed registry. A missing or unreadable file yields an empty one.
    pub async fn load(&self) -> Registry {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Registry::default(),
            Err(e) => {
                tracing::warn!(
                    "Failed to read registry {}: {}. Starting empty.",
                    self.path.display(),
                    e
                );
                return Registry::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!(
                    "Registry {} is malformed: {}. Starting empty.",
                    self.path.display(),
                    e
                );
                Registry::default()
            }
        }
    }

    /// Opens a write transaction on a freshly loaded registry.
    pub async fn begin(&self) -> RegistryTxn<'_> {
        let guard = self.writer.lock().await;
        let registry = self.load().await;
        RegistryTxn {
            store: self,
            registry,
            _guard: guard,
        }
    }

    async fn write(&self, registry: &Registry) -> Result<()> {
        let content = to_json(registry)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, content)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        tracing::debug!(
            "Saved {} users to {}",
            registry.len(),
            self.path.display()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "registry".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }
}

/// A registry loaded under the writer lock. Dropping it without `commit` discards the changes.
pub struct RegistryTxn<'a> {
    store: &'a RegistryStore,
    registry: Registry,
    _guard: MutexGuard<'a, ()>,
}

impl RegistryTxn<'_> {
    /// Writes the whole document back and releases the lock.
    pub async fn commit(self) -> Result<()> {
        self.store.write(&self.registry).await
    }
}

impl Deref for RegistryTxn<'_> {
    type Target = Registry;

    fn deref(&self) -> &Registry {
        &self.registry
    }
}

impl DerefMut for RegistryTxn<'_> {
    fn deref_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}

/// Serializes with 4-space indentation and unescaped UTF-8.
pub fn to_json(registry: &Registry) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    registry
        .serialize(&mut ser)
        .context("Failed to serialize registry")?;
    String::from_utf8(buf).context("Registry serialized to invalid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store_in(dir: &tempfile::TempDir) -> RegistryStore {
        RegistryStore::new(dir.path().join("users.json"))
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().await.is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_commit_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join("nested/users.json"));

        let mut txn = store.begin().await;
        txn.upsert("алиса", "W1", 1.5);
        txn.commit().await.unwrap();

        let reg = store.load().await;
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.users[0].username, "алиса");
        assert_eq!(reg.users[0].balance, 1.5);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("алиса"));
        assert!(raw.contains("\n    \"users\""));
        assert!(!dir.path().join("nested/.users.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_dropped_txn_discards_changes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        {
            let mut txn = store.begin().await;
            txn.upsert("alice", "W1", 1.0);
        }
        assert!(store.load().await.is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_save_of_load_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let original = r#"{
    "users": [
        {
            "username": "alice",
            "wallet": "W1",
            "balance": 10.0
        },
        {
            "username": "bob",
            "wallet": "W2",
            "balance": 0.125
        }
    ]
}"#;
        std::fs::write(store.path(), original).unwrap();

        store.begin().await.commit().await.unwrap();

        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), original);
    }

    #[tokio::test]
    async fn test_concurrent_writers_do_not_lose_updates() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut txn = store.begin().await;
                tokio::task::yield_now().await;
                txn.upsert(&format!("user{i}"), "W", i as f64);
                txn.commit().await.unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(store.load().await.len(), 8);
    }
}
