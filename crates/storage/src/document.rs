//! Temporally-sharded document store.
//!
//! Documents are immutable payloads identified by their content hash and
//! partitioned by a 4-digit archive year chosen at write time. Retrieval
//! can walk backward year by year: a short `lookback` depth for full
//! fetches, a separate and typically much longer `existback` depth for
//! cheap existence probes. Both depths count the start year, so a depth
//! of 1 means the start year only.

use crate::cache::{YearCache, DEFAULT_CAPACITY};
use crate::fsa::FileSystem;
use crate::meta::{DocumentMeta, Metadata};
use crate::paths::{self, DocumentPaths};
use crate::DocError;
use common::{lang, year as year_util};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Default backward-search depth for full document retrieval.
pub const DEFAULT_LOOKBACK_YEARS: usize = 10;
/// Default backward-search depth for existence probes.
pub const DEFAULT_EXISTBACK_YEARS: usize = 100;

const MAX_BACK_YEARS: usize = 1000;

pub struct DocumentStore {
    lookback_years: usize,
    existback_years: usize,
    fs: FileSystem,
    cache: YearCache,
    // Ids with a store in progress. Claiming here makes the existence
    // check and the cache update atomic under concurrent stores of the
    // same new id: exactly one caller wins, the rest see a conflict.
    in_flight: Mutex<HashSet<String>>,
}

fn resolve_year(year: &str) -> String {
    if year.is_empty() {
        year_util::current_year()
    } else {
        year.to_string()
    }
}

impl DocumentStore {
    pub fn new(root_path: impl Into<PathBuf>) -> Result<Self, DocError> {
        Ok(Self {
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            existback_years: DEFAULT_EXISTBACK_YEARS,
            fs: FileSystem::new(root_path)?,
            cache: YearCache::new(DEFAULT_CAPACITY),
            in_flight: Mutex::new(HashSet::new()),
        })
    }

    /// Set the retrieval backward-search depth. Out-of-range values are
    /// rejected with a warning and the current value is kept.
    pub fn set_lookback_years(&mut self, years: usize) {
        if years == 0 || years > MAX_BACK_YEARS {
            warn!(target: "arch::dev", years, "Invalid lookback years, keeping current value");
            return;
        }
        self.lookback_years = years;
    }

    /// Set the existence-probe backward-search depth, bounds-checked the
    /// same way as the lookback depth.
    pub fn set_existback_years(&mut self, years: usize) {
        if years == 0 || years > MAX_BACK_YEARS {
            warn!(target: "arch::dev", years, "Invalid existback years, keeping current value");
            return;
        }
        self.existback_years = years;
    }

    /// Store a document and its default (language-less) metadata.
    /// An empty year selects the current calendar year; the resolved
    /// year is returned. Storing an id that already exists is a
    /// conflict, not an overwrite.
    pub async fn store(
        &self,
        year: &str,
        doc_id: &str,
        data: &[u8],
        meta: &dyn Metadata,
    ) -> Result<String, DocError> {
        let doc_id = doc_id.to_ascii_lowercase();

        if self.cache.get(&doc_id).is_some() {
            return Err(DocError::AlreadyExists);
        }
        let _claim = self.claim(&doc_id).ok_or(DocError::AlreadyExists)?;

        let year = resolve_year(year);
        let doc_paths = paths::calculate(&year, &doc_id)?;

        // Equal ids imply equal bytes, so there is never a reason to
        // accept a second upload.
        if self.fs.exists(&doc_paths.data).await {
            return Err(DocError::AlreadyExists);
        }
        self.fs.write(&doc_paths.data, data).await?;

        // A metadata failure past this point leaves the payload in
        // place: data-present-metadata-missing is a recoverable state
        // the caller can detect, not a corruption.
        let meta_bytes = meta.marshal()?;
        self.fs.write(&doc_paths.meta, &meta_bytes).await?;

        info!(target: "arch::data", did = %doc_id, year = %year, "Document stored");

        self.cache.insert(&doc_id, &year);
        Ok(year)
    }

    /// Store one metadata variant on its own; the default variant when
    /// lang is empty. The document must already exist at that year.
    /// Overwriting an existing variant is allowed and logged.
    pub async fn store_meta(
        &self,
        year: &str,
        doc_id: &str,
        meta: &dyn Metadata,
        lang_tag: &str,
    ) -> Result<String, DocError> {
        let doc_id = doc_id.to_ascii_lowercase();
        let year = resolve_year(year);
        let doc_paths = paths::calculate(&year, &doc_id)?;

        // Metadata never precedes its document.
        if !self.fs.exists(&doc_paths.data).await {
            return Err(DocError::NotFound("document".to_string()));
        }

        let lang_tag = lang::normalize(lang_tag);
        let meta_path = doc_paths.meta_for(&lang_tag);
        if self.fs.exists(&meta_path).await {
            warn!(
                target: "arch::data",
                did = %doc_id, year = %year, lang = %lang_tag,
                "Document meta file overwritten"
            );
        }

        let meta_bytes = meta.marshal()?;
        self.fs.write(&meta_path, &meta_bytes).await?;

        info!(
            target: "arch::data",
            did = %doc_id, year = %year, lang = %lang_tag,
            "Written localized metadata"
        );
        Ok(year)
    }

    /// Check existence at an exact year, no backward search.
    pub async fn exists(&self, year: &str, doc_id: &str) -> bool {
        let doc_id = doc_id.to_ascii_lowercase();

        if self.cache.get(&doc_id).is_some() {
            return true;
        }
        match paths::calculate(year, &doc_id) {
            Ok(p) => self.fs.exists(&p.data).await,
            Err(_) => false,
        }
    }

    /// Check existence walking backward from a start year (empty =
    /// current year) over the existback depth. Returns the year the
    /// document was found in.
    pub async fn exists_from_year(&self, year: &str, doc_id: &str) -> Option<String> {
        let doc_id = doc_id.to_ascii_lowercase();

        if let Some(y) = self.cache.get(&doc_id) {
            return Some(y);
        }
        match self
            .find_document_year(year, &doc_id, self.existback_years)
            .await
        {
            Ok(y) => {
                self.cache.insert(&doc_id, &y);
                Some(y)
            }
            Err(e) => {
                error!(target: "arch::dev", "Find document year failed: {}", e);
                None
            }
        }
    }

    /// Fetch document data and metadata at an exact year, no backward
    /// search. The language variant falls back to the default metadata.
    pub async fn get(
        &self,
        year: &str,
        doc_id: &str,
        lang_tag: &str,
    ) -> Result<(Vec<u8>, DocumentMeta), DocError> {
        let doc_id = doc_id.to_ascii_lowercase();

        let data = match self.document_data(year, &doc_id).await {
            Ok(d) => d,
            Err(e) => {
                warn!(target: "arch::dev", did = %doc_id, year = %year, "Failed to get document data");
                return Err(e);
            }
        };
        let meta = match self
            .meta_with_year(year, &doc_id, &lang::normalize(lang_tag))
            .await
        {
            Ok(m) => m,
            Err(e) => {
                warn!(target: "arch::dev", did = %doc_id, year = %year, "Failed to get metadata");
                return Err(e);
            }
        };
        Ok((data, meta))
    }

    /// Fetch document data and metadata, walking backward from a start
    /// year (empty = current) over the lookback depth. Also returns the
    /// year the document was found in.
    pub async fn get_from_year(
        &self,
        year: &str,
        doc_id: &str,
        lang_tag: &str,
    ) -> Result<(Vec<u8>, DocumentMeta, String), DocError> {
        let doc_id = doc_id.to_ascii_lowercase();
        let year = self.resolve_cached_year(year, &doc_id, self.lookback_years).await?;

        let data = self.document_data(&year, &doc_id).await?;
        let meta = self
            .meta_with_year(&year, &doc_id, &lang::normalize(lang_tag))
            .await?;
        Ok((data, meta, year))
    }

    /// Fetch metadata only at an exact year.
    pub async fn get_meta(
        &self,
        year: &str,
        doc_id: &str,
        lang_tag: &str,
    ) -> Result<DocumentMeta, DocError> {
        let doc_id = doc_id.to_ascii_lowercase();

        match self
            .meta_with_year(year, &doc_id, &lang::normalize(lang_tag))
            .await
        {
            Ok(m) => Ok(m),
            Err(e) => {
                warn!(target: "arch::dev", did = %doc_id, year = %year, "Failed to get metadata");
                Err(e)
            }
        }
    }

    /// Fetch metadata only, with the same backward search as
    /// `get_from_year`.
    pub async fn get_meta_from_year(
        &self,
        year: &str,
        doc_id: &str,
        lang_tag: &str,
    ) -> Result<(DocumentMeta, String), DocError> {
        let doc_id = doc_id.to_ascii_lowercase();
        let year = self.resolve_cached_year(year, &doc_id, self.lookback_years).await?;

        let meta = self
            .meta_with_year(&year, &doc_id, &lang::normalize(lang_tag))
            .await?;
        Ok((meta, year))
    }

    /// Delete a document: its data, every metadata variant, then the
    /// leaf directory. The exact archive year is required.
    pub async fn delete(&self, year: &str, doc_id: &str) -> Result<(), DocError> {
        let doc_id = doc_id.to_ascii_lowercase();
        let doc_paths = paths::calculate(year, &doc_id)?;

        self.fs.remove(&doc_paths.data).await?;
        self.cache.remove(&doc_id);

        info!(target: "arch::data", did = %doc_id, year = %year, "Document deleted");

        self.delete_meta_all(&doc_paths).await?;

        info!(target: "arch::data", did = %doc_id, year = %year, "Document all metadata deleted");

        self.fs.remove(&doc_paths.dir).await?;
        Ok(())
    }

    /// Delete a single metadata variant; the default when lang is empty.
    /// The exact archive year is required.
    pub async fn delete_meta(
        &self,
        year: &str,
        doc_id: &str,
        lang_tag: &str,
    ) -> Result<(), DocError> {
        let doc_id = doc_id.to_ascii_lowercase();
        let doc_paths = paths::calculate(year, &doc_id)?;

        let lang_tag = lang::normalize(lang_tag);
        self.fs.remove(&doc_paths.meta_for(&lang_tag)).await?;

        info!(
            target: "arch::data",
            did = %doc_id, year = %year, lang = %lang_tag,
            "Document metadata deleted"
        );
        Ok(())
    }

    pub fn close(&self) -> Result<(), DocError> {
        self.fs.close()
    }

    fn claim(&self, doc_id: &str) -> Option<Claim<'_>> {
        if self.in_flight.lock().unwrap().insert(doc_id.to_string()) {
            Some(Claim {
                store: self,
                doc_id: doc_id.to_string(),
            })
        } else {
            None
        }
    }

    /// Year a document lives in: the cache if it knows, else a backward
    /// walk that populates the cache on success.
    async fn resolve_cached_year(
        &self,
        year: &str,
        doc_id: &str,
        max_years: usize,
    ) -> Result<String, DocError> {
        if let Some(y) = self.cache.get(doc_id) {
            return Ok(y);
        }
        let y = self.find_document_year(year, doc_id, max_years).await?;
        self.cache.insert(doc_id, &y);
        Ok(y)
    }

    /// Walk backward year by year until the document is found or the
    /// depth is exhausted. The depth counts the start year itself.
    async fn find_document_year(
        &self,
        year: &str,
        doc_id: &str,
        max_years: usize,
    ) -> Result<String, DocError> {
        let mut current = resolve_year(year);
        let start = year_util::parse_year(&current)
            .ok_or_else(|| DocError::InvalidYear(current.clone()))?;

        for i in 1..=max_years {
            let doc_paths = paths::calculate(&current, doc_id)?;
            if self.fs.exists(&doc_paths.data).await {
                return Ok(current);
            }
            current = format!("{:04}", start - i as i32);
        }
        Err(DocError::NotFound("document".to_string()))
    }

    async fn document_data(&self, year: &str, doc_id: &str) -> Result<Vec<u8>, DocError> {
        let doc_paths = paths::calculate(year, doc_id)?;
        self.fs.read(&doc_paths.data).await
    }

    /// Read metadata for a year, preferring the language variant and
    /// falling back to the default file. Never a partial merge.
    async fn meta_with_year(
        &self,
        year: &str,
        doc_id: &str,
        lang_tag: &str,
    ) -> Result<DocumentMeta, DocError> {
        let doc_paths = paths::calculate(year, doc_id)?;

        let mut meta_path = doc_paths.meta.clone();
        if !lang_tag.is_empty() {
            let lang_path = doc_paths.meta_for(lang_tag);
            if self.fs.exists(&lang_path).await {
                meta_path = lang_path;
            }
        }

        let bytes = self.fs.read(&meta_path).await?;
        let mut meta = DocumentMeta::default();
        meta.unmarshal(&bytes)?;
        Ok(meta)
    }

    async fn delete_meta_all(&self, doc_paths: &DocumentPaths) -> Result<(), DocError> {
        let files = self.fs.list(&doc_paths.dir).await?;
        for file in files {
            if file.find(".meta").map_or(false, |i| i > 0) {
                self.fs.remove(&doc_paths.dir.join(&file)).await?;
            }
        }
        Ok(())
    }
}

struct Claim<'a> {
    store: &'a DocumentStore,
    doc_id: String,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.store.in_flight.lock().unwrap().remove(&self.doc_id);
    }
}
