//! Saves export documents to disk, standing in for a browser download.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::ExportDocument;

pub fn save_document(dir: &Path, document: &ExportDocument) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory '{}'", dir.display()))?;
    let path = dir.join(&document.filename);
    fs::write(&path, &document.bytes)
        .with_context(|| format!("failed to write export '{}'", path.display()))?;
    tracing::info!(
        path = %path.display(),
        bytes = document.bytes.len(),
        mime_type = document.mime_type,
        "export saved"
    );
    Ok(path)
}
