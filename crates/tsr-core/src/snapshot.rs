//! Persisted document snapshots.
//!
//! The dashboard keeps the document under review as a JSON snapshot under a
//! well-known key. Here the key maps to `<dir>/<key>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::models::document::Document;

/// Key of the document currently under review.
pub const CURRENT_DOCUMENT_KEY: &str = "current-document";

/// Directory-backed snapshot storage.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Store the current document.
    pub fn save(&self, document: &Document) -> Result<PathBuf> {
        self.save_as(CURRENT_DOCUMENT_KEY, document)
    }

    /// Store a document under `key`, replacing any previous snapshot.
    pub fn save_as(&self, key: &str, document: &Document) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        fs::write(&path, serde_json::to_string_pretty(document)?)?;
        debug!("Saved snapshot {} to {}", document.id, path.display());
        Ok(path)
    }

    /// Load the current document, if one was saved.
    pub fn load(&self) -> Result<Option<Document>> {
        self.load_key(CURRENT_DOCUMENT_KEY)
    }

    /// Load the snapshot stored under `key`.
    pub fn load_key(&self, key: &str) -> Result<Option<Document>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(load_file(&path)?))
    }

    /// Remove the current document snapshot.
    pub fn clear(&self) -> Result<()> {
        let path = self.path_for(CURRENT_DOCUMENT_KEY);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Read a snapshot from an arbitrary file.
pub fn load_file(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentKind;
    use crate::models::field::DocumentField;
    use pretty_assertions::assert_eq;

    fn document() -> Document {
        Document::new("Series A Term Sheet", DocumentKind::Pdf).with_fields(vec![
            DocumentField::new("field-1", "Company Name", "Acme Corporation", true),
            DocumentField::new("field-2", "Closing Date", "invalid-date", false),
        ])
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("snapshots"));

        assert_eq!(store.load().unwrap(), None);

        let doc = document();
        let path = store.save(&doc).unwrap();
        assert!(path.ends_with("current-document.json"));
        assert_eq!(store.load().unwrap(), Some(doc));
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.save(&document()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        fs::write(store.path_for(CURRENT_DOCUMENT_KEY), "{not json").unwrap();

        assert!(matches!(store.load(), Err(crate::TsrError::Json(_))));
    }
}
