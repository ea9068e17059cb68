//! Text extraction from source files.
//!
//! [`ExtractText`] is the seam between the ingestion pipeline and concrete
//! file formats. The built-in [`PlainTextExtractor`] handles UTF-8 text;
//! format-specific extractors (PDF, office documents) plug in behind the
//! same trait without touching the pipeline.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::models::{MAX_FILE_SIZE_BYTES, MAX_FILE_SIZE_MB};

/// Extracts the full text of one source file.
pub trait ExtractText: Send + Sync {
    fn extract(&self, source: &Path) -> Result<String>;
}

/// Reads UTF-8 text files, enforcing the per-document size limit.
pub struct PlainTextExtractor;

impl ExtractText for PlainTextExtractor {
    fn extract(&self, source: &Path) -> Result<String> {
        let meta = std::fs::metadata(source)
            .with_context(|| format!("cannot stat {}", source.display()))?;
        if meta.len() > MAX_FILE_SIZE_BYTES {
            bail!(
                "{} is {} bytes, over the {} MB limit",
                source.display(),
                meta.len(),
                MAX_FILE_SIZE_MB
            );
        }
        std::fs::read_to_string(source)
            .with_context(|| format!("cannot read {} as UTF-8 text", source.display()))
    }
}
