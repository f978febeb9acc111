//! Append-only document archive over a hierarchical filesystem layout.
//!
//! Documents are content-addressed binary payloads referenced from a
//! ledger by hash. The archive partitions them by year, fans them out
//! across hash-derived subdirectories, and layers per-language metadata
//! over a language-less default.

pub mod cache;
pub mod document;
pub mod error;
pub mod fsa;
pub mod meta;
pub mod paths;

pub use document::{DocumentStore, DEFAULT_EXISTBACK_YEARS, DEFAULT_LOOKBACK_YEARS};
pub use error::DocError;
pub use meta::{BaseMeta, DocumentMeta, MetaCreator, MetaRegistry, Metadata, FILE_SYSTEM};
