//! Document path computation.
//!
//! The first three bytes of the hex id fan documents out across three
//! directory levels; the leaf directory carries the full id, so distinct
//! ids never collide even when they share a prefix. File names use the
//! first 16 hex characters of the id.

use crate::DocError;
use std::path::PathBuf;

/// Longest id prefix used for data/metadata file names.
const FNAME_LEN: usize = 16;

/// Computed locations of a document's pieces, relative to the store root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentPaths {
    /// Leaf directory holding the document and its metadata.
    pub dir: PathBuf,
    /// Document payload file.
    pub data: PathBuf,
    /// Default (language-less) metadata file.
    pub meta: PathBuf,
}

impl DocumentPaths {
    /// Metadata file for a language; the default file when lang is empty.
    /// The language must already be normalized.
    pub fn meta_for(&self, lang: &str) -> PathBuf {
        if lang.is_empty() {
            self.meta.clone()
        } else {
            let mut p = self.meta.clone().into_os_string();
            p.push(".");
            p.push(lang);
            PathBuf::from(p)
        }
    }
}

/// Compute storage paths from (year, id). The id must be a well-formed
/// lowercase-hex document id; anything else is rejected outright rather
/// than bucketed under a sentinel directory.
pub fn calculate(year: &str, doc_id: &str) -> Result<DocumentPaths, DocError> {
    if !common::hash::is_valid_id(doc_id) {
        return Err(DocError::InvalidId(doc_id.to_string()));
    }
    let doc_id = &doc_id.to_ascii_lowercase();

    let byte1 = format!("0x{}", &doc_id[0..2]);
    let byte2 = doc_id[2..4].to_ascii_uppercase();
    // Third byte rendered as 3-digit decimal.
    let byte3 = format!("{:03}", u8::from_str_radix(&doc_id[4..6], 16).unwrap_or(0));

    let dir = PathBuf::from(year)
        .join(byte1)
        .join(byte2)
        .join(byte3)
        .join(doc_id);
    let fname = &doc_id[..FNAME_LEN];

    Ok(DocumentPaths {
        data: dir.join(format!("{}.data", fname)),
        meta: dir.join(format!("{}.meta", fname)),
        dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_of(data: &[u8]) -> String {
        common::hash::digest_hex(data)
    }

    #[test]
    fn test_layout_shape() {
        // sha256("hello") = 2cf24dba5fb0a30e26e8...; 0x4d = 77
        let id = id_of(b"hello");
        let paths = calculate("2026", &id).unwrap();

        let dir = format!("2026/0x2c/F2/077/{}", id);
        assert_eq!(paths.dir, PathBuf::from(&dir));
        assert_eq!(
            paths.data,
            PathBuf::from(format!("{}/2cf24dba5fb0a30e.data", dir))
        );
        assert_eq!(
            paths.meta,
            PathBuf::from(format!("{}/2cf24dba5fb0a30e.meta", dir))
        );
    }

    #[test]
    fn test_pure_function() {
        let id = id_of(b"same");
        assert_eq!(calculate("2024", &id).unwrap(), calculate("2024", &id).unwrap());
        assert_ne!(calculate("2024", &id).unwrap(), calculate("2025", &id).unwrap());
    }

    #[test]
    fn test_case_insensitive_identity() {
        let id = id_of(b"same");
        assert_eq!(
            calculate("2024", &id).unwrap(),
            calculate("2024", &id.to_ascii_uppercase()).unwrap()
        );
    }

    #[test]
    fn test_shared_prefix_distinct_leaf() {
        // Fabricated ids sharing the first three bytes.
        let a = format!("aabbcc{}", "0".repeat(58));
        let b = format!("aabbcc{}", "1".repeat(58));
        let pa = calculate("2026", &a).unwrap();
        let pb = calculate("2026", &b).unwrap();
        assert_eq!(pa.dir.parent(), pb.dir.parent());
        assert_ne!(pa.dir, pb.dir);
    }

    #[test]
    fn test_malformed_id_is_rejected() {
        assert!(matches!(
            calculate("2026", "abc"),
            Err(DocError::InvalidId(_))
        ));
        let bad = format!("zz{}", "0".repeat(62));
        assert!(matches!(
            calculate("2026", &bad),
            Err(DocError::InvalidId(_))
        ));
        assert!(matches!(calculate("2026", ""), Err(DocError::InvalidId(_))));
    }

    #[test]
    fn test_meta_for_language() {
        let id = id_of(b"hello");
        let paths = calculate("2026", &id).unwrap();
        assert_eq!(paths.meta_for(""), paths.meta);
        assert_eq!(
            paths.meta_for("zh_cn"),
            PathBuf::from(format!("{}.zh_cn", paths.meta.display()))
        );
    }
}
