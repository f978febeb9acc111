use anyhow::{bail, Context, Result};
use common::StoreDocResponse;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Poll the health endpoint until the server answers.
pub async fn wait_for_server(server_url: &str) -> Result<()> {
    let client = reqwest::Client::new();
    for _ in 0..30 {
        if let Ok(resp) = client
            .get(format!("{}/health", server_url))
            .send()
            .await
        {
            if resp.status().is_success() {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    bail!("Server at {} did not become ready", server_url)
}

/// Payload unique to this run, so reruns against a persistent archive
/// never collide with earlier documents.
pub fn unique_payload(label: &str) -> Vec<u8> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("e2e:{}:{}", label, nanos).into_bytes()
}

/// Upload a document and return the server's reply.
pub async fn upload_document(
    server_url: &str,
    payload: &[u8],
    content_type: &str,
    title: &str,
) -> Result<StoreDocResponse> {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/api/document", server_url))
        .header("Content-Type", content_type)
        .header("X-Document-Title", title)
        .header("X-Document-Uploader", "e2e")
        .body(payload.to_vec())
        .send()
        .await
        .context("Upload request failed")?;

    if !resp.status().is_success() {
        bail!("Upload rejected: {}", resp.status());
    }
    resp.json().await.context("Invalid upload response")
}

/// Upload a metadata JSON body for a language variant.
pub async fn upload_meta(
    server_url: &str,
    doc_id: &str,
    lang: &str,
    meta_json: &serde_json::Value,
) -> Result<reqwest::StatusCode> {
    let client = reqwest::Client::new();
    let url = if lang.is_empty() {
        format!("{}/api/meta/{}", server_url, doc_id)
    } else {
        format!("{}/api/meta/{}/{}", server_url, doc_id, lang)
    };
    let resp = client
        .put(url)
        .header("Content-Type", "application/json")
        .body(meta_json.to_string())
        .send()
        .await
        .context("Metadata upload request failed")?;
    Ok(resp.status())
}
