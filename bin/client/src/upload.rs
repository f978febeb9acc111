use anyhow::{bail, Context, Result};
use common::{StoreDocResponse, StoreMetaResponse};
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Upload a document payload with its descriptive headers.
pub fn upload_document(
    server: &str,
    file: &Path,
    content_type: &str,
    title: Option<String>,
    summary: Option<String>,
    uploader: Option<String>,
) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("Failed to read file: {:?}", file))?;
    let expected_id = common::hash::digest_hex(&data);

    let client = reqwest::blocking::Client::new();
    let mut req = client
        .post(format!("{}/api/document", server))
        .header("Content-Type", content_type)
        .body(data);
    if let Some(title) = title {
        req = req.header("X-Document-Title", title);
    }
    if let Some(summary) = summary {
        req = req.header("X-Document-Summary", summary);
    }
    if let Some(uploader) = uploader {
        req = req.header("X-Document-Uploader", uploader);
    }

    let resp = req.send().context("Upload request failed")?;
    if !resp.status().is_success() {
        bail!(
            "Upload rejected ({}): {}",
            resp.status(),
            resp.text().unwrap_or_default()
        );
    }

    let reply: StoreDocResponse = resp.json().context("Invalid upload response")?;
    if reply.document_id != expected_id {
        warn!(
            "Server reported id {} but local hash is {}",
            reply.document_id, expected_id
        );
    }
    info!("{}", reply.message);
    println!("{} archived in {}", reply.document_id, reply.year);
    Ok(())
}

/// Upload a metadata JSON file, optionally for a specific language.
pub fn upload_meta(server: &str, doc_id: &str, file: &Path, lang: Option<&str>) -> Result<()> {
    let body = fs::read(file).with_context(|| format!("Failed to read file: {:?}", file))?;

    let url = match lang {
        Some(lang) if !lang.is_empty() => format!("{}/api/meta/{}/{}", server, doc_id, lang),
        _ => format!("{}/api/meta/{}", server, doc_id),
    };

    let client = reqwest::blocking::Client::new();
    let resp = client
        .put(url)
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .context("Metadata upload request failed")?;

    if !resp.status().is_success() {
        bail!(
            "Metadata upload rejected ({}): {}",
            resp.status(),
            resp.text().unwrap_or_default()
        );
    }

    let reply: StoreMetaResponse = resp.json().context("Invalid metadata upload response")?;
    info!("{}", reply.message);
    println!("metadata for {} stored in {}", reply.document_id, reply.year);
    Ok(())
}
