//! History persistence behind a small key-value contract.
//!
//! The history is stored as a JSON array of `{id, content, sender, timestamp}`
//! records under a single key. Missing or unreadable data never fails the
//! caller: it yields a fresh history seeded with the greeting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use kindred_core::config::GeneralConfig;
use kindred_core::types::Message;

use crate::error::ChatError;
use crate::store::ConversationStore;

/// Key-value storage for serialized histories.
pub trait HistoryStore: Send + Sync {
    /// Read the value under `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<String>, ChatError>;

    /// Replace the value under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), ChatError>;
}

// =============================================================================
// MemoryHistoryStore
// =============================================================================

/// In-process store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with `value` already present under `key`.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, ChatError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| ChatError::Storage(format!("history lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ChatError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ChatError::Storage(format!("history lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// FileHistoryStore
// =============================================================================

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under `[general] data_dir`, with `~` expanded.
    pub fn from_config(general: &GeneralConfig) -> Result<Self, ChatError> {
        let dir = general.resolve_data_dir()?;
        tracing::debug!(dir = %dir.display(), "File history store configured");
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Path separators in the key are flattened.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, ChatError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ChatError::Storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ChatError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|e| ChatError::Storage(format!("failed to write {}: {}", path.display(), e)))
    }
}

// =============================================================================
// Codec
// =============================================================================

pub fn encode_history(messages: &[Message]) -> Result<String, ChatError> {
    Ok(serde_json::to_string(messages)?)
}

pub fn decode_history(data: &str) -> Result<Vec<Message>, ChatError> {
    Ok(serde_json::from_str(data)?)
}

/// Load the history under `key`, seeding the greeting when there is none.
///
/// Absent data, an empty array, unparseable data, and backend errors all
/// produce the single-greeting history.
pub fn load_history<S: HistoryStore + ?Sized>(
    store: &S,
    key: &str,
    greeting: &str,
) -> ConversationStore {
    let raw = match store.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "No saved history, starting fresh");
            return ConversationStore::seeded(greeting);
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read saved history, starting fresh");
            return ConversationStore::seeded(greeting);
        }
    };

    match decode_history(&raw) {
        Ok(messages) if messages.is_empty() => ConversationStore::seeded(greeting),
        Ok(messages) => {
            tracing::info!(key, count = messages.len(), "History restored");
            ConversationStore::from_messages(messages)
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Saved history is malformed, starting fresh");
            ConversationStore::seeded(greeting)
        }
    }
}

/// Serialize and store the whole history under `key`.
pub fn save_history<S: HistoryStore + ?Sized>(
    store: &S,
    key: &str,
    history: &ConversationStore,
) -> Result<(), ChatError> {
    let data = encode_history(history.messages())?;
    store.save(key, &data)
}

// =============================================================================
// Tests
// =============================================================================
