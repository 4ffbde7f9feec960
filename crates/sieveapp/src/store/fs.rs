use super::DocumentStore;
use crate::error::{Result, SieveError};
use crate::model::Document;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A [`Document`] backed by a JSON file.
///
/// The file is read once on [`FileStore::open`]; [`DocumentStore::save`] writes the
/// whole document back through a temp file and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    document: Document,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|e| {
            SieveError::Store(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let document: Document = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            forms = document.forms.len(),
            collections = document.collections.len(),
            "loaded document"
        );
        Ok(Self { path, document })
    }

    /// Creates a store for `path` without reading it. Nothing is written until `save`.
    pub fn create(path: impl Into<PathBuf>, document: Document) -> Self {
        Self {
            path: path.into(),
            document,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileStore {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn save(&mut self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.document)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(SieveError::Io)?;
        }

        let tmp_file = dir.join(format!(".sieve-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(SieveError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(SieveError::Io(e));
        }
        tracing::debug!(path = %self.path.display(), "saved document");
        Ok(())
    }
}
