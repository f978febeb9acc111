//! Rooted filesystem adapter.
//!
//! Thin read/write/list/remove primitives over a configured root
//! directory. All paths passed in are relative; building them so they
//! cannot escape the root is the caller's job.

use crate::DocError;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileSystem {
    root_dir: PathBuf,
}

impl FileSystem {
    /// Create the adapter, making sure the root directory exists.
    pub fn new(root_dir: impl Into<PathBuf>) -> Result<Self, DocError> {
        let root_dir = root_dir.into();
        std::fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        self.root_dir.join(path)
    }

    /// Write data, creating intermediate directories as needed.
    pub async fn write(&self, path: &Path, data: &[u8]) -> Result<(), DocError> {
        let path = self.full_path(path);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, data).await?;

        debug!(target: "arch::dev", path = ?path, size = data.len(), "File written");
        Ok(())
    }

    /// Read a file, failing with a not-found condition if absent.
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, DocError> {
        let path = self.full_path(path);
        match tokio::fs::read(&path).await {
            Ok(data) => {
                debug!(target: "arch::dev", path = ?path, size = data.len(), "File read");
                Ok(data)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DocError::NotFound(format!("file: {}", path.display())))
            }
            Err(e) => Err(DocError::Io(e)),
        }
    }

    /// Check whether a file or directory exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(self.full_path(path)).await.is_ok()
    }

    /// Remove a file or an empty directory, failing with not-found if absent.
    pub async fn remove(&self, path: &Path) -> Result<(), DocError> {
        let path = self.full_path(path);
        let meta = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DocError::NotFound(format!("file: {}", path.display())));
            }
            Err(e) => return Err(DocError::Io(e)),
        };
        if meta.is_dir() {
            tokio::fs::remove_dir(&path).await?;
        } else {
            tokio::fs::remove_file(&path).await?;
        }

        debug!(target: "arch::dev", path = ?path, "File removed");
        Ok(())
    }

    /// List file names in a directory, non-recursive, directories skipped.
    pub async fn list(&self, dir_path: &Path) -> Result<Vec<String>, DocError> {
        let dir_path = self.full_path(dir_path);
        let mut entries = match tokio::fs::read_dir(&dir_path).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DocError::NotFound(format!(
                    "directory: {}",
                    dir_path.display()
                )));
            }
            Err(e) => return Err(DocError::Io(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    files.push(name.to_string());
                }
            }
        }
        Ok(files)
    }

    /// No cleanup needed for local disk.
    pub fn close(&self) -> Result<(), DocError> {
        Ok(())
    }
}
