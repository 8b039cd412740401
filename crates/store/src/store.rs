//! Atomic JSON file persistence for the document.
//!
//! Saves write the serialized document to a sibling temp file and rename
//! it over the target, so a crash or disk error mid-write can never leave
//! the backup slot and the live items in a half-persisted state - the old
//! document survives intact or the new one lands whole.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::document::Document;

/// Errors from loading or saving the document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The document on disk is not valid JSON for the current shape.
    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),
}

/// File-backed store for the single inventory document.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// A store backed by `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, or a default one if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or
    /// parsed. A corrupt document is surfaced rather than silently
    /// replaced.
    pub fn load(&self) -> Result<Document, StoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no document yet, starting empty");
            return Ok(Document::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        let doc = serde_json::from_str(&raw)?;
        Ok(doc)
    }

    /// Persist the document atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or any filesystem step
    /// fails. On failure the previous document is still in place.
    pub fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(doc)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(
            path = %self.path.display(),
            items = doc.items.len(),
            "document saved"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map_or_else(
            || std::ffi::OsString::from("document.json"),
            std::borrow::ToOwned::to_owned,
        );
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfline_core::{Item, ItemCode};

    #[test]
    fn test_missing_file_loads_default_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonStore::new(dir.path().join("inventory-db.json"));
        let doc = store.load().expect("load");
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonStore::new(dir.path().join("inventory-db.json"));

        let mut doc = Document::default();
        doc.items
            .push(Item::new(ItemCode::new("A1").expect("valid code")));
        doc.settings.reminder_days = 14;
        store.save(&doc).expect("save");

        let loaded = store.load().expect("load");
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_save_replaces_atomically_without_leftover_tmp() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("inventory-db.json");
        let store = JsonStore::new(&path);

        store.save(&Document::default()).expect("first save");
        let mut doc = Document::default();
        doc.items
            .push(Item::new(ItemCode::new("B2").expect("valid code")));
        store.save(&doc).expect("second save");

        assert_eq!(store.load().expect("load").items.len(), 1);
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(Result::ok)
            .filter(|entry| entry.path() != path)
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_corrupt_document_is_an_error_not_a_reset() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("inventory-db.json");
        fs::write(&path, b"{ not json").expect("write");
        let store = JsonStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Document(_))));
    }
}
