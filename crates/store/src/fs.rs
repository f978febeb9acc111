//! Local filesystem blob driver.
//!
//! Registered under the names "fs" and "filesystem". Blobs land under a
//! configured root, fanned out by an identifier path template so that no
//! single directory accumulates every object.

use crate::shard::{IdTemplate, TimeTemplate};
use crate::{BlobStore, Config, Driver, StoreError};
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::io::SeekFrom;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tokio::sync::oneshot;
use tracing::debug;

/// Default blob root directory.
pub const BLOB_DIR: &str = "_blobs";
/// Default timestamp path template for time-partitioned layouts.
pub const DOC_PATH: &str = "Y/M/D";
/// Default identifier path template.
pub const RES_PATH: &str = "1/2/3";

fn default_root() -> String {
    BLOB_DIR.to_string()
}

fn default_docpath() -> String {
    DOC_PATH.to_string()
}

fn default_respath() -> String {
    RES_PATH.to_string()
}

/// Filesystem driver configuration.
#[derive(Deserialize)]
struct FsConfig {
    /// Blob storage root directory.
    #[serde(default = "default_root")]
    root: String,
    /// Timestamp path template, e.g. "Y/M/D".
    #[serde(default = "default_docpath")]
    docpath: String,
    /// Identifier path template, e.g. "1/2/3".
    #[serde(default = "default_respath")]
    respath: String,
}

/// Filesystem driver.
pub struct FsDriver;

impl Driver for FsDriver {
    fn connect(&self, cfg: &Config) -> Result<Arc<dyn BlobStore>, StoreError> {
        let cfg: FsConfig =
            serde_json::from_str(cfg).map_err(|e| StoreError::Config(e.to_string()))?;
        // Both templates are validated up front; a bad layout string is
        // a connect-time failure, not a per-blob surprise.
        let time_subs = TimeTemplate::parse(&cfg.docpath)?;
        Ok(Arc::new(FsBlobStore {
            root: PathBuf::from(cfg.root),
            subs: IdTemplate::parse(&cfg.respath)?,
            time_subs,
        }))
    }
}

/// Filesystem-backed blob store connection.
pub struct FsBlobStore {
    root: PathBuf,
    subs: IdTemplate,
    /// Timestamp fan-out, for layouts that partition by write time.
    time_subs: TimeTemplate,
}

impl FsBlobStore {
    /// Subdirectory chain for a timestamp under this connection's
    /// configured layout.
    pub fn time_dir<T: chrono::Datelike + chrono::Timelike>(&self, tm: &T) -> PathBuf {
        self.root.join(self.time_subs.dir(tm))
    }

    fn blob_path(&self, id: &[u8]) -> PathBuf {
        let hexid = hex::encode(id);
        self.root.join(self.subs.dir(&hexid)).join(hexid)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn fetch(&self, id: &[u8]) -> Result<Box<dyn AsyncRead + Send + Unpin>, StoreError> {
        let path = self.blob_path(id);
        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(hex::encode(id)))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn save(&self, data: Vec<u8>, id: &[u8]) -> oneshot::Receiver<Result<(), StoreError>> {
        let (tx, rx) = oneshot::channel();
        let path = self.blob_path(id);
        tokio::spawn(async move {
            let res: std::io::Result<()> = async {
                if let Some(dir) = path.parent() {
                    tokio::fs::create_dir_all(dir).await?;
                }
                tokio::fs::write(&path, &data).await
            }
            .await;
            if res.is_ok() {
                debug!(path = ?path, size = data.len(), "Blob saved");
            }
            let _ = tx.send(res.map_err(StoreError::Io));
        });
        rx
    }

    fn remove(&self, id: &[u8]) -> oneshot::Receiver<Result<(), StoreError>> {
        let (tx, rx) = oneshot::channel();
        let path = self.blob_path(id);
        let hexid = hex::encode(id);
        tokio::spawn(async move {
            let res = match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(StoreError::NotFound(hexid))
                }
                Err(e) => Err(StoreError::Io(e)),
            };
            let _ = tx.send(res);
        });
        rx
    }

    async fn range_hash(&self, id: &[u8], beg: u64, size: i64) -> Option<[u8; 32]> {
        let path = self.blob_path(id);
        let mut file = tokio::fs::File::open(&path).await.ok()?;
        let len = file.metadata().await.ok()?.len();

        let end = match size {
            -1 => len,
            s if s < 0 => return None,
            s => beg.checked_add(s as u64)?,
        };
        // Zero-length or out-of-bounds: nothing to attest.
        if end <= beg || end > len {
            return None;
        }

        file.seek(SeekFrom::Start(beg)).await.ok()?;
        let mut hasher = Sha256::new();
        let mut remaining = end - beg;
        let mut buf = vec![0u8; 64 * 1024];
        while remaining > 0 {
            let want = remaining.min(buf.len() as u64) as usize;
            let n = file.read(&mut buf[..want]).await.ok()?;
            if n == 0 {
                return None;
            }
            hasher.update(&buf[..n]);
            remaining -= n as u64;
        }
        Some(hasher.finalize().into())
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
