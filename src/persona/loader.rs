//! Persona source document loading.
//!
//! Plain text and Markdown are read as UTF-8. PDF profiles are supported
//! when built with the `pdf` feature.

use anyhow::{anyhow, Result};
use std::fs;
use std::path::Path;

/// Read a persona document fully into memory
pub fn load_document(path: &Path) -> Result<String> {
    if is_pdf(path) {
        return load_pdf(path);
    }

    let text = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read persona document {:?}: {}", path, e))?;
    Ok(text)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(feature = "pdf")]
fn load_pdf(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).map_err(|e| anyhow!("Failed to read persona document {:?}: {}", path, e))?;
    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| anyhow!("PDF text extraction failed for {:?}: {}", path, e))?;
    Ok(text.trim().to_string())
}

#[cfg(not(feature = "pdf"))]
fn load_pdf(path: &Path) -> Result<String> {
    Err(anyhow!(
        "Persona document {:?} is a PDF; rebuild with `--features pdf` or supply a text export",
        path
    ))
}
