//! File storage collaborator.
//!
//! Uploaded images are stored under a media root using relative paths
//! produced by [`crate::image_naming`]. The sitemap artifact is written to
//! an explicit target path through the same trait.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

/// Reference to a file persisted by a [`FileStorage`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    /// Path relative to the storage root, always using `/` separators.
    pub relative_path: String,
    pub size_bytes: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage path '{0}'")]
    InvalidPath(String),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Storage backend for uploaded files and published documents.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist `data` at `relative_path` under the storage root.
    async fn save(&self, relative_path: &str, data: &[u8]) -> Result<StoredFile, StorageError>;

    /// Remove a stored file. Returns `false` if it did not exist.
    async fn delete(&self, relative_path: &str) -> Result<bool, StorageError>;

    /// Write a whole document to `target`, replacing any previous content.
    async fn write_document(&self, target: &Path, contents: &[u8]) -> Result<(), StorageError>;
}

/// [`FileStorage`] backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path under the root, refusing anything that could escape it.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf, StorageError> {
        let candidate = Path::new(relative_path);
        let is_safe = !relative_path.is_empty()
            && candidate
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_safe {
            return Err(StorageError::InvalidPath(relative_path.to_string()));
        }
        Ok(self.root.join(candidate))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(&self, relative_path: &str, data: &[u8]) -> Result<StoredFile, StorageError> {
        let full_path = self.resolve(relative_path)?;
        write_file(&full_path, data).await?;
        Ok(StoredFile {
            relative_path: relative_path.to_string(),
            size_bytes: data.len() as u64,
        })
    }

    async fn delete(&self, relative_path: &str) -> Result<bool, StorageError> {
        let full_path = self.resolve(relative_path)?;
        match tokio::fs::remove_file(&full_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::Io {
                path: full_path,
                source,
            }),
        }
    }

    async fn write_document(&self, target: &Path, contents: &[u8]) -> Result<(), StorageError> {
        write_file(target, contents).await
    }
}

async fn write_file(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, data)
        .await
        .map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn save_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        let stored = storage
            .save("accommodations/acc1/images/pool-1a2b3c4d.jpg", b"jpeg")
            .await
            .unwrap();

        assert_eq!(stored.size_bytes, 4);
        let on_disk = dir
            .path()
            .join("accommodations/acc1/images/pool-1a2b3c4d.jpg");
        assert_eq!(std::fs::read(on_disk).unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn delete_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        storage.save("a/b.png", b"png").await.unwrap();
        assert!(storage.delete("a/b.png").await.unwrap());
        assert!(!storage.delete("a/b.png").await.unwrap());
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let storage = LocalFileStorage::new("/srv/media");
        assert_matches!(storage.resolve("../etc/passwd"), Err(StorageError::InvalidPath(_)));
        assert_matches!(storage.resolve("/etc/passwd"), Err(StorageError::InvalidPath(_)));
        assert_matches!(storage.resolve(""), Err(StorageError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn write_document_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());
        let target = dir.path().join("out/sitemap.json");

        storage.write_document(&target, b"[1, 2, 3]").await.unwrap();
        storage.write_document(&target, b"[]").await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"[]");
    }
}
