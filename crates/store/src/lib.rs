//! Raw byte store abstraction.
//!
//! Content is addressed by its hash, so a stored blob is never modified in
//! place; a changed payload is a new blob under a new id. Backends are
//! pluggable drivers resolved by name through a [`Registry`] built once at
//! startup and passed to whoever opens connections.

pub mod fs;
pub mod shard;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::sync::oneshot;

pub use fs::FsDriver;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("store configuration error: {0}")]
    Config(String),
    #[error("store I/O failure")]
    Io(#[from] std::io::Error),
}

/// Driver configuration, a JSON document.
/// Backends differ in what they need to connect, so the registry passes
/// the raw text through and each driver parses its own shape.
pub type Config = str;

/// A named backend able to open blob store connections.
pub trait Driver: Send + Sync {
    fn connect(&self, cfg: &Config) -> Result<Arc<dyn BlobStore>, StoreError>;
}

/// Byte-addressed blob storage.
///
/// `save` and `remove` complete asynchronously; the returned single-use
/// channel yields `Ok(())` on success. `range_hash` is the partial-proof
/// primitive: it attests to a byte range without the caller re-fetching
/// and re-hashing the whole object.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Reader over the stored bytes, or a not-found error.
    async fn fetch(&self, id: &[u8]) -> Result<Box<dyn AsyncRead + Send + Unpin>, StoreError>;

    /// Store a blob under the given id. Completion (or failure) is
    /// signaled through the returned channel.
    fn save(&self, data: Vec<u8>, id: &[u8]) -> oneshot::Receiver<Result<(), StoreError>>;

    /// Remove the blob with the given id, signaling like `save`.
    fn remove(&self, id: &[u8]) -> oneshot::Receiver<Result<(), StoreError>>;

    /// Digest of the byte range `[beg, beg+size)` of the stored content.
    /// `size = -1` means to the end of data, so `beg = 0, size = -1`
    /// reproduces the whole-object digest. A zero-length or out-of-bounds
    /// range returns `None`: no proof available, not an error.
    async fn range_hash(&self, id: &[u8], beg: u64, size: i64) -> Option<[u8; 32]>;

    /// Release the connection.
    async fn close(&self) -> Result<(), StoreError>;
}

/// Driver registry, resolved once at startup.
///
/// Wiring mistakes (duplicate names, unknown drivers) are configuration
/// errors surfaced before traffic flows; the host decides to log and exit.
#[derive(Default)]
pub struct Registry {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the filesystem driver wired under its aliases.
    pub fn with_defaults() -> Result<Self, StoreError> {
        let mut reg = Self::new();
        let fs = Arc::new(FsDriver);
        reg.register("fs", fs.clone())?;
        reg.register("filesystem", fs)?;
        Ok(reg)
    }

    /// Register a driver under a name, e.g. "fs", "mongodb", "sqlite".
    pub fn register(&mut self, name: &str, driver: Arc<dyn Driver>) -> Result<(), StoreError> {
        if self.drivers.contains_key(name) {
            return Err(StoreError::Config(format!(
                "driver {} already registered",
                name
            )));
        }
        self.drivers.insert(name.to_string(), driver);
        Ok(())
    }

    /// Open a store connection. The same driver name opens the same
    /// underlying store, but each call is a fresh connection.
    pub fn open(&self, name: &str, cfg: &Config) -> Result<Arc<dyn BlobStore>, StoreError> {
        let driver = self
            .drivers
            .get(name)
            .ok_or_else(|| StoreError::Config(format!("no driver registered as {}", name)))?;
        driver.connect(cfg)
    }

    /// Sorted list of registered driver names.
    pub fn drivers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_fs_aliases() {
        let reg = Registry::with_defaults().unwrap();
        assert_eq!(reg.drivers(), vec!["filesystem", "fs"]);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut reg = Registry::with_defaults().unwrap();
        let err = reg.register("fs", Arc::new(FsDriver)).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_unknown_driver_rejected() {
        let reg = Registry::with_defaults().unwrap();
        let err = reg.open("mongodb", "{}").map(|_| ()).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_open_parses_config() {
        let reg = Registry::with_defaults().unwrap();
        assert!(reg
            .open("fs", r#"{"root": "_blobs", "respath": "1/2"}"#)
            .is_ok());
        assert!(reg.open("fs", "not json").is_err());
    }
}
