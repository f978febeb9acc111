mod filesystem_validator;
mod test_utils;

use anyhow::{ensure, Context, Result};
use std::path::PathBuf;
use test_utils::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("e2e_tests=debug,info")
        .init();

    let server_url =
        std::env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    // When set, the on-disk layout is validated too; point it at the
    // server's --data-dir.
    let data_dir = std::env::var("DATA_DIR").ok().map(PathBuf::from);

    println!("Server URL: {}", server_url);
    wait_for_server(&server_url).await?;

    println!("\n📤 Testing upload and fetch round trip...");
    let payload = unique_payload("roundtrip");
    let doc_id = common::hash::digest_hex(&payload);
    let reply = upload_document(&server_url, &payload, "text/plain", "E2E Roundtrip").await?;
    ensure!(reply.document_id == doc_id, "Server id differs from local hash");
    ensure!(!reply.year.is_empty(), "Upload reply has no year");

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("{}/document/{}/{}", server_url, reply.year, doc_id))
        .send()
        .await?;
    ensure!(resp.status().is_success(), "Exact-year fetch failed");
    ensure!(
        resp.headers().get("X-Document-Title").is_some(),
        "Missing title header"
    );
    let body = resp.bytes().await?;
    ensure!(body.as_ref() == payload.as_slice(), "Fetched bytes differ");
    println!("✅ Round trip passed");

    println!("\n📤 Testing duplicate upload conflict...");
    let resp = client
        .post(format!("{}/api/document", server_url))
        .header("Content-Type", "text/plain")
        .body(payload.clone())
        .send()
        .await?;
    ensure!(
        resp.status() == reqwest::StatusCode::CONFLICT,
        "Duplicate upload returned {}, expected 409",
        resp.status()
    );
    println!("✅ Duplicate conflict passed");

    println!("\n📤 Testing metadata language overlay...");
    let fr_meta = serde_json::json!({
        "type": "text/plain",
        "title": "Titre français",
        "summary": "",
        "uploader": "e2e",
        "upload_time": 0,
        "size": payload.len(),
        "language": "fr"
    });
    let status = upload_meta(&server_url, &doc_id, "fr", &fr_meta).await?;
    ensure!(status.is_success(), "fr metadata upload failed: {}", status);

    let meta: serde_json::Value = client
        .get(format!("{}/meta/{}/fr", server_url, doc_id))
        .send()
        .await?
        .json()
        .await
        .context("fr metadata fetch failed")?;
    ensure!(meta["title"] == "Titre français", "fr variant not returned");

    let meta: serde_json::Value = client
        .get(format!("{}/meta/{}/de", server_url, doc_id))
        .send()
        .await?
        .json()
        .await
        .context("de metadata fetch failed")?;
    ensure!(
        meta["title"] == "E2E Roundtrip",
        "de request did not fall back to default metadata"
    );
    println!("✅ Metadata overlay passed");

    println!("\n📤 Testing metadata before document is rejected...");
    let orphan = unique_payload("orphan");
    let orphan_id = common::hash::digest_hex(&orphan);
    let status = upload_meta(&server_url, &orphan_id, "fr", &fr_meta).await?;
    ensure!(
        status == reqwest::StatusCode::NOT_FOUND,
        "Orphan metadata returned {}, expected 404",
        status
    );
    println!("✅ Orphan metadata rejection passed");

    println!("\n📤 Testing existence probes...");
    let resp = client
        .head(format!("{}/document/{}/{}", server_url, reply.year, doc_id))
        .send()
        .await?;
    ensure!(resp.status().is_success(), "Exact-year probe failed");

    let resp = client
        .head(format!("{}/document/{}", server_url, doc_id))
        .send()
        .await?;
    ensure!(resp.status().is_success(), "Backward-search probe failed");
    let probe_year = resp
        .headers()
        .get("X-Document-Year")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    ensure!(probe_year == reply.year, "Probe year {} != {}", probe_year, reply.year);

    let resp = client
        .head(format!("{}/document/{}", server_url, orphan_id))
        .send()
        .await?;
    ensure!(
        resp.status() == reqwest::StatusCode::NOT_FOUND,
        "Probe for unknown document returned {}",
        resp.status()
    );
    println!("✅ Existence probes passed");

    if let Some(data_dir) = data_dir {
        println!("\n🔍 Validating on-disk layout...");
        filesystem_validator::validate_document(&data_dir, &reply.year, &doc_id, &payload, &["fr"])?;
        println!("✅ Filesystem layout passed");
    } else {
        println!("\nDATA_DIR not set, skipping on-disk layout validation");
    }

    println!("\n✅ All E2E tests passed!");
    Ok(())
}
