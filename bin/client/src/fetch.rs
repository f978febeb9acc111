use anyhow::{bail, Context, Result};
use log::info;
use std::io::Write;
use std::path::Path;

fn document_url(server: &str, doc_id: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) if !lang.is_empty() => format!("{}/document/{}/{}", server, doc_id, lang),
        _ => format!("{}/document/{}", server, doc_id),
    }
}

/// Fetch a document by id with the server's backward year search,
/// writing the payload to a file or stdout.
pub fn fetch_document(
    server: &str,
    doc_id: &str,
    year: Option<&str>,
    lang: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let mut req = client.get(document_url(server, doc_id, lang));
    if let Some(year) = year {
        req = req.query(&[("year", year)]);
    }

    let resp = req.send().context("Fetch request failed")?;
    if !resp.status().is_success() {
        bail!("Document not available ({})", resp.status());
    }

    let resolved_year = header(&resp, "X-Document-Year");
    let title = header(&resp, "X-Document-Title");
    info!("Found document in year {} (title: {})", resolved_year, title);

    let data = resp.bytes().context("Failed to read document body")?;
    match output {
        Some(path) => {
            std::fs::write(path, &data)
                .with_context(|| format!("Failed to write output: {:?}", path))?;
            println!("{} bytes written to {:?}", data.len(), path);
        }
        None => {
            std::io::stdout().write_all(&data)?;
        }
    }
    Ok(())
}

/// Fetch a document's metadata JSON and print it.
pub fn fetch_meta(server: &str, doc_id: &str, year: Option<&str>, lang: Option<&str>) -> Result<()> {
    let url = match lang {
        Some(lang) if !lang.is_empty() => format!("{}/meta/{}/{}", server, doc_id, lang),
        _ => format!("{}/meta/{}", server, doc_id),
    };

    let client = reqwest::blocking::Client::new();
    let mut req = client.get(url);
    if let Some(year) = year {
        req = req.query(&[("year", year)]);
    }

    let resp = req.send().context("Metadata request failed")?;
    if !resp.status().is_success() {
        bail!("Metadata not available ({})", resp.status());
    }

    let resolved_year = header(&resp, "X-Document-Year");
    if !resolved_year.is_empty() {
        info!("Found metadata in year {}", resolved_year);
    }
    println!("{}", resp.text().context("Failed to read metadata body")?);
    Ok(())
}

/// Probe document existence with the long backward search.
pub fn exists(server: &str, doc_id: &str, year: Option<&str>) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let mut req = client.head(format!("{}/document/{}", server, doc_id));
    if let Some(year) = year {
        req = req.query(&[("year", year)]);
    }

    let resp = req.send().context("Existence probe failed")?;
    if resp.status().is_success() {
        println!("found in {}", header(&resp, "X-Document-Year"));
    } else {
        println!("not found");
    }
    Ok(())
}

fn header(resp: &reqwest::blocking::Response, name: &str) -> String {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}
