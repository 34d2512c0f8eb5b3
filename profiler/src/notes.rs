//! Personal notes store - a JSON array of strings in one file
//!
//! Notes are append-only and ordered by insertion. There is no delete.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{ProfilerError, ProfilerResult};

/// File-backed notes store
#[derive(Clone)]
pub struct NoteStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Arc<Mutex<()>>,
}

impl NoteStore {
    /// Create a store backed by the file at `path` (created on first append)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the store file: `<file name>.tmp`
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "notes".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// All notes in insertion order; a missing file is an empty store
    pub async fn list(&self) -> ProfilerResult<Vec<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Append one note to the end of the store.
    ///
    /// An unparseable store file is left untouched and reported as an error.
    pub async fn append(&self, note: &str) -> ProfilerResult<()> {
        if note.is_empty() {
            return Err(ProfilerError::validation("Invalid note"));
        }

        let _guard = self.write_lock.lock().await;

        let mut notes = self.list().await?;
        notes.push(note.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(&notes)?;
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!("Appended note #{} to {}", notes.len(), self.path.display());
        Ok(())
    }
}
