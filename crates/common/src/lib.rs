pub mod hash;
pub mod lang;
pub mod year;

use serde::{Deserialize, Serialize};

/// Response returned after a document upload.
/// The id is the content hash of the payload; the year is where the
/// archive placed the document.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoreDocResponse {
    pub document_id: String,
    pub year: String,
    pub doc_size: String,
    pub message: String,
}

/// Response returned after a metadata upload (default or per-language).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoreMetaResponse {
    pub document_id: String,
    pub year: String,
    pub message: String,
}

/// Query parameters for the backward-searching fetch/probe endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct YearQuery {
    /// Search start year; empty or absent means the current calendar year.
    #[serde(default)]
    pub year: String,
}

/// Response from health check endpoint
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String, // "ok" when healthy
}
