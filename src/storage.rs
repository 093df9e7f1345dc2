//! Durable key-value storage for the contact collection.
//!
//! The [`Storage`] trait is a namespaced string store: one key holds one
//! serialized [`PersistedState`] envelope. It mirrors the browser
//! local-storage model the collection was originally kept in, and lets
//! the store run against a directory of JSON files or a plain in-memory
//! map.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Contact;

/// The envelope written under the storage key: `{ "contacts": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Serialize)]
struct PersistedStateRef<'a> {
    contacts: &'a [Contact],
}

/// Serialize a collection into the envelope format without cloning it.
pub fn encode_state(contacts: &[Contact]) -> Result<String> {
    serde_json::to_string(&PersistedStateRef { contacts })
        .context("Failed to serialize contact collection")
}

pub fn decode_state(raw: &str) -> Result<PersistedState> {
    serde_json::from_str(raw).context("Failed to parse stored contact collection")
}

/// Abstract durable storage backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`load`](Storage::load) | Read the raw envelope under a key, if any |
/// | [`save`](Storage::save) | Replace the raw envelope under a key |
#[async_trait]
pub trait Storage: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;

    async fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed storage: each key maps to `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                debug!(path = %path.display(), bytes = raw.len(), "loaded storage entry");
                Ok(Some(raw))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no storage entry yet");
                Ok(None)
            }
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read storage file: {}", path.display()))
            }
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create storage dir: {}", self.dir.display()))?;

        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        tokio::fs::write(&tmp, value)
            .await
            .with_context(|| format!("Failed to write storage file: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to replace storage file: {}", path.display()))?;

        debug!(path = %path.display(), bytes = value.len(), "saved storage entry");
        Ok(())
    }
}

/// In-memory storage for tests and embedding.
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Raw snapshot currently held under `key`.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key).await
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value).await
    }
}

/// Storage keys double as file names, so they are restricted to
/// `[A-Za-z0-9_-]`.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("storage key must not be empty");
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        bail!(
            "storage key '{}' may only contain letters, digits, '-' and '_'",
            key
        );
    }
    Ok(())
}
