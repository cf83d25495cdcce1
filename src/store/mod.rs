//! Named playbook persistence.
//!
//! A store is a flat key-value space of JSON documents. Implementations provide four raw
//! primitives; the playbook semantics (defaults on a missing load, explicit failures for
//! rename/copy/delete of a missing source, name validation) live in the provided methods
//! of [`PlaybookStore`] so every backend behaves the same way.

mod fs;
mod import;
mod memory;

pub use fs::FileStore;
pub use import::{ImportConflict, import_into, parse_import};
pub use memory::MemoryStore;

use crate::document::{LOAD_ERROR_TEXT, PlaybookDocument};
use crate::error::StoreError;
use itertools::Itertools;
use tracing::{info, warn};

/// Name reported by [`PlaybookStore::list`] when the store holds nothing.
pub const DEFAULT_PLAYBOOK: &str = "default_flow.json";
const EXTENSION: &str = ".json";

/// Turns a display name into a store key: `"Home Insurance"` becomes `home_insurance.json`.
pub fn playbook_file_name(display_name: &str) -> String {
    let stem = display_name
        .split_whitespace()
        .map(str::to_lowercase)
        .join("_");
    format!("{}{}", stem, EXTENSION)
}

/// Validates a playbook name and appends `.json` when it is missing.
pub fn normalize_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == EXTENSION
        || trimmed.contains(['/', '\\'])
        || trimmed.contains("..")
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    if trimmed.ends_with(EXTENSION) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}{}", trimmed, EXTENSION))
    }
}

pub trait PlaybookStore {
    /// Keys of every stored document, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Raw JSON stored under `key`, or `None` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Creates or replaces `key`. A failure must leave any previous content intact.
    fn write(&mut self, key: &str, json: &str) -> Result<(), StoreError>;

    /// Removes `key`. Returns whether it existed.
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;

    /// Names of all stored playbooks. An empty store reports [`DEFAULT_PLAYBOOK`].
    fn list(&self) -> Result<Vec<String>, StoreError> {
        let keys = self.keys()?;
        if keys.is_empty() {
            Ok(vec![DEFAULT_PLAYBOOK.to_string()])
        } else {
            Ok(keys)
        }
    }

    fn exists(&self, name: &str) -> Result<bool, StoreError> {
        let key = normalize_name(name)?;
        Ok(self.read(&key)?.is_some())
    }

    /// Loads a playbook. A missing name yields the default document rather than an error.
    fn load(&self, name: &str) -> Result<PlaybookDocument, StoreError> {
        let key = normalize_name(name)?;
        let mut document = match self.read(&key)? {
            Some(json) => PlaybookDocument::from_json(&json).map_err(|e| match e {
                StoreError::Parse { message, .. } => StoreError::Parse {
                    name: key.clone(),
                    message,
                },
                other => other,
            })?,
            None => {
                info!(playbook = %key, "playbook not found, using the default document");
                PlaybookDocument::default()
            }
        };
        document.filename = Some(key.clone());
        info!(playbook = %key, nodes = document.nodes.len(), edges = document.edges.len(), "loaded playbook");
        Ok(document)
    }

    /// Creates or overwrites a playbook.
    fn save(&mut self, name: &str, document: &PlaybookDocument) -> Result<(), StoreError> {
        let key = normalize_name(name)?;
        let json = document.to_json().map_err(|e| match e {
            StoreError::Serialize { message, .. } => StoreError::Serialize {
                name: key.clone(),
                message,
            },
            other => other,
        })?;
        self.write(&key, &json)?;
        info!(playbook = %key, nodes = document.nodes.len(), "saved playbook");
        Ok(())
    }

    fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), StoreError> {
        let from = normalize_name(old_name)?;
        let to = normalize_name(new_name)?;
        let json = self.read(&from)?.ok_or_else(|| StoreError::NotFound(from.clone()))?;
        if from != to {
            self.write(&to, &json)?;
            self.remove(&from)?;
        }
        info!(from = %from, to = %to, "renamed playbook");
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        let key = normalize_name(name)?;
        if !self.remove(&key)? {
            return Err(StoreError::NotFound(key));
        }
        info!(playbook = %key, "deleted playbook");
        Ok(())
    }

    fn copy(&mut self, source_name: &str, new_name: &str) -> Result<(), StoreError> {
        let from = normalize_name(source_name)?;
        let to = normalize_name(new_name)?;
        let json = self.read(&from)?.ok_or_else(|| StoreError::NotFound(from.clone()))?;
        self.write(&to, &json)?;
        info!(from = %from, to = %to, "copied playbook");
        Ok(())
    }
}

/// Loads `name`, substituting a placeholder document when the stored content is unusable.
pub fn load_or_placeholder<S: PlaybookStore + ?Sized>(store: &S, name: &str) -> PlaybookDocument {
    match store.load(name) {
        Ok(document) => document,
        Err(e) => {
            warn!(playbook = %name, error = %e, "failed to load playbook, substituting a placeholder");
            PlaybookDocument::placeholder(LOAD_ERROR_TEXT)
        }
    }
}
