//! Document storage.
//!
//! Sessions receive the store as an `Arc<dyn DocumentStore>` so several
//! sessions can share one instance. Writes are last-writer-wins; there is no
//! versioning.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::ChatError;

/// A named block of text that can be mentioned as `@id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

pub trait DocumentStore: Send + Sync {
    fn get(&self, id: &str) -> Result<String, ChatError>;

    /// Document ids in insertion order.
    fn list(&self) -> Vec<String>;

    /// Inserts or replaces a document. Replacing keeps the original position.
    fn put(&self, id: &str, content: String);

    /// Replaces every occurrence of `old` with `new` and returns the result.
    ///
    /// No chat command edits documents; this is for hosts that embed the
    /// store and expose editing themselves, such as a tool-call handler.
    fn edit(&self, id: &str, old: &str, new: &str) -> Result<String, ChatError>;
}

#[derive(Default)]
struct StoreInner {
    order: Vec<String>,
    contents: HashMap<String, String>,
}

/// Process-local store backed by a map plus an insertion-order index.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let store = Self::new();
        for doc in documents {
            store.put(&doc.id, doc.content);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, id: &str) -> Result<String, ChatError> {
        self.read()
            .contents
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::DocumentNotFound(id.to_string()))
    }

    fn list(&self) -> Vec<String> {
        self.read().order.clone()
    }

    fn put(&self, id: &str, content: String) {
        let mut inner = self.write();
        if inner.contents.insert(id.to_string(), content).is_none() {
            inner.order.push(id.to_string());
        }
        debug!(doc_id = %id, "Stored document");
    }

    fn edit(&self, id: &str, old: &str, new: &str) -> Result<String, ChatError> {
        let mut inner = self.write();
        let content = inner
            .contents
            .get_mut(id)
            .ok_or_else(|| ChatError::DocumentNotFound(id.to_string()))?;
        *content = content.replace(old, new);
        debug!(doc_id = %id, len = content.len(), "Edited document");
        Ok(content.clone())
    }
}
