use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::parser::Document;

/// `<title><suffix>`, with characters that are unsafe in file names replaced by `_`.
pub fn file_name(title: &str, suffix: &str) -> String {
    let safe: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}{}", safe, suffix)
}

/// Write the document as pretty JSON (non-ASCII kept verbatim) into `dir`.
pub fn save_document(doc: &Document, dir: &Path, suffix: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output dir {}", dir.display()))?;
    let path = dir.join(file_name(&doc.title, suffix));
    let json = serde_json::to_string_pretty(doc).context("Failed to serialize document")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {} sections to {}", doc.sections.len(), path.display());
    Ok(path)
}
