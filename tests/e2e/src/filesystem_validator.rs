use anyhow::{ensure, Context, Result};
use std::path::{Path, PathBuf};

/// Leaf directory of a document under the archive root, mirroring the
/// server's sharding: year/0x<b1>/<B2>/<b3 decimal>/<full id>.
fn document_dir(data_dir: &Path, year: &str, doc_id: &str) -> PathBuf {
    let byte1 = format!("0x{}", &doc_id[0..2]);
    let byte2 = doc_id[2..4].to_ascii_uppercase();
    let byte3 = format!("{:03}", u8::from_str_radix(&doc_id[4..6], 16).unwrap());
    data_dir
        .join(year)
        .join(byte1)
        .join(byte2)
        .join(byte3)
        .join(doc_id)
}

/// Validate the on-disk shape of an archived document: sharded leaf
/// directory, payload bytes, indented default metadata, and any
/// expected language variants.
pub fn validate_document(
    data_dir: &Path,
    year: &str,
    doc_id: &str,
    payload: &[u8],
    langs: &[&str],
) -> Result<()> {
    let dir = document_dir(data_dir, year, doc_id);
    ensure!(dir.is_dir(), "Missing document directory: {:?}", dir);

    let fname = &doc_id[..16];
    let data_file = dir.join(format!("{}.data", fname));
    let stored = std::fs::read(&data_file)
        .with_context(|| format!("Missing data file: {:?}", data_file))?;
    ensure!(stored == payload, "Stored bytes differ from uploaded payload");

    let meta_file = dir.join(format!("{}.meta", fname));
    let meta_text = std::fs::read_to_string(&meta_file)
        .with_context(|| format!("Missing metadata file: {:?}", meta_file))?;
    ensure!(
        meta_text.contains('\n'),
        "Metadata is not indented JSON: {:?}",
        meta_file
    );
    serde_json::from_str::<serde_json::Value>(&meta_text)
        .with_context(|| format!("Metadata is not valid JSON: {:?}", meta_file))?;

    for lang in langs {
        let lang_file = dir.join(format!("{}.meta.{}", fname, lang));
        ensure!(
            lang_file.is_file(),
            "Missing language metadata variant: {:?}",
            lang_file
        );
    }
    Ok(())
}
