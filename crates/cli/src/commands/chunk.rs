//! `selene chunk`: Split a document and print its chunks.

use std::path::Path;

use selene_context::ContextEngine;

use super::{load_config, read_text};

pub fn run(config: Option<&Path>, file: &Path, document_id: Option<String>) -> anyhow::Result<()> {
    let engine = ContextEngine::new(load_config(config)?);
    let text = read_text(file)?;

    let document_id = document_id.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".into())
    });

    let chunks = engine.chunk(&document_id, &text);
    tracing::info!(document_id = %document_id, chunks = chunks.len(), "Chunked document");
    println!("{}", serde_json::to_string_pretty(&chunks)?);
    Ok(())
}
