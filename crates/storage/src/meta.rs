//! Document metadata model.
//!
//! Every document carries exactly one default (language-less) metadata
//! object plus any number of per-language variants, each a complete
//! object. Metadata is written as indented JSON so the archive stays
//! inspectable with ordinary tools.

use crate::DocError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Registry name of the filesystem document kind.
pub const FILE_SYSTEM: &str = "fss";

/// Capability set every metadata variant implements.
///
/// Setters keep the current value when handed an empty string or a
/// non-positive number, so partially-filled requests never blank out
/// fields that were already set.
pub trait Metadata: Send + Sync {
    fn doc_type(&self) -> &str;
    fn set_doc_type(&mut self, t: &str);

    fn title(&self) -> &str;
    fn set_title(&mut self, t: &str);

    fn summary(&self) -> &str;
    fn set_summary(&mut self, s: &str);

    fn uploader(&self) -> &str;
    fn set_uploader(&mut self, u: &str);

    /// Upload time, epoch seconds.
    fn upload_time(&self) -> i64;
    fn set_upload_time(&mut self, t: i64);

    /// Payload size in bytes.
    fn size(&self) -> u64;
    fn set_size(&mut self, n: u64);

    /// Encode as indented JSON.
    fn marshal(&self) -> Result<Vec<u8>, DocError>;
    /// Decode from JSON, replacing the current contents.
    fn unmarshal(&mut self, data: &[u8]) -> Result<(), DocError>;
}

/// Fields common to every document kind.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BaseMeta {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub title: String,
    pub summary: String,
    pub uploader: String,
    pub upload_time: i64,
    pub size: u64,
}

/// Metadata for the filesystem document kind.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    #[serde(flatten)]
    pub base: BaseMeta,
    /// Primary language of the content.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
    /// Original author.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    /// Copyright notice.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub copyright: String,
    /// Original creation time of the content, free-form.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub create_time: String,
}

impl DocumentMeta {
    pub fn new(base: BaseMeta) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }
}

impl Metadata for DocumentMeta {
    fn doc_type(&self) -> &str {
        &self.base.doc_type
    }

    fn set_doc_type(&mut self, t: &str) {
        if !t.is_empty() {
            self.base.doc_type = t.to_string();
        }
    }

    fn title(&self) -> &str {
        &self.base.title
    }

    fn set_title(&mut self, t: &str) {
        if !t.is_empty() {
            self.base.title = t.to_string();
        }
    }

    fn summary(&self) -> &str {
        &self.base.summary
    }

    fn set_summary(&mut self, s: &str) {
        if !s.is_empty() {
            self.base.summary = s.to_string();
        }
    }

    fn uploader(&self) -> &str {
        &self.base.uploader
    }

    fn set_uploader(&mut self, u: &str) {
        if !u.is_empty() {
            self.base.uploader = u.to_string();
        }
    }

    fn upload_time(&self) -> i64 {
        self.base.upload_time
    }

    fn set_upload_time(&mut self, t: i64) {
        if t > 0 {
            self.base.upload_time = t;
        }
    }

    fn size(&self) -> u64 {
        self.base.size
    }

    fn set_size(&mut self, n: u64) {
        if n > 0 {
            self.base.size = n;
        }
    }

    fn marshal(&self) -> Result<Vec<u8>, DocError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    fn unmarshal(&mut self, data: &[u8]) -> Result<(), DocError> {
        *self = serde_json::from_slice(data)?;
        Ok(())
    }
}

/// Constructor for one document kind's metadata.
pub type MetaCreator = fn(BaseMeta) -> Box<dyn Metadata>;

fn new_document_meta(base: BaseMeta) -> Box<dyn Metadata> {
    Box::new(DocumentMeta::new(base))
}

/// Metadata factory registry, resolved once at startup like the blob
/// driver registry.
#[derive(Default)]
pub struct MetaRegistry {
    creators: HashMap<String, MetaCreator>,
}

impl MetaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the filesystem document kind wired.
    pub fn with_defaults() -> Result<Self, DocError> {
        let mut reg = Self::new();
        reg.register(FILE_SYSTEM, new_document_meta)?;
        Ok(reg)
    }

    pub fn register(&mut self, name: &str, creator: MetaCreator) -> Result<(), DocError> {
        if self.creators.contains_key(name) {
            return Err(DocError::InvalidConfig(format!(
                "meta creator {} already registered",
                name
            )));
        }
        self.creators.insert(name.to_string(), creator);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<MetaCreator> {
        self.creators.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_keep_values_on_empty_input() {
        let mut meta = DocumentMeta::default();
        meta.set_title("First");
        meta.set_title("");
        assert_eq!(meta.title(), "First");

        meta.set_size(42);
        meta.set_size(0);
        assert_eq!(meta.size(), 42);

        meta.set_upload_time(1700000000);
        meta.set_upload_time(-1);
        assert_eq!(meta.upload_time(), 1700000000);
    }

    #[test]
    fn test_marshal_is_indented() {
        let mut meta = DocumentMeta::default();
        meta.set_doc_type("text/plain");
        meta.set_title("Notes");
        let bytes = meta.marshal().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains('\n'));
        assert!(text.contains("\"type\": \"text/plain\""));
    }

    #[test]
    fn test_marshal_roundtrip() {
        let meta = DocumentMeta {
            base: BaseMeta {
                doc_type: "text/html".to_string(),
                title: "T".to_string(),
                summary: "S".to_string(),
                uploader: "U".to_string(),
                upload_time: 1712345678,
                size: 512,
            },
            language: "en".to_string(),
            author: "A".to_string(),
            copyright: String::new(),
            create_time: String::new(),
        };
        let bytes = meta.marshal().unwrap();
        let mut decoded = DocumentMeta::default();
        decoded.unmarshal(&bytes).unwrap();
        assert_eq!(decoded, meta);
    }

    #[test]
    fn test_empty_extensions_are_omitted() {
        let meta = DocumentMeta::default();
        let text = String::from_utf8(meta.marshal().unwrap()).unwrap();
        assert!(!text.contains("language"));
        assert!(!text.contains("copyright"));
    }

    #[test]
    fn test_registry() {
        let reg = MetaRegistry::with_defaults().unwrap();
        let creator = reg.get(FILE_SYSTEM).unwrap();
        let mut meta = creator(BaseMeta::default());
        meta.set_title("via factory");
        assert_eq!(meta.title(), "via factory");
        assert!(reg.get("unknown").is_none());
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut reg = MetaRegistry::with_defaults().unwrap();
        assert!(reg.register(FILE_SYSTEM, new_document_meta).is_err());
    }
}
