//! Batch ingestion pipeline.
//!
//! Coordinates the full add flow: extraction → chunking → state update →
//! persistence. Sources are processed strictly one at a time, in the order
//! given, and the state is saved after each document so a crash mid-batch
//! loses at most the file being processed. A failed source is reported and
//! skipped; it never aborts the rest of the batch.

use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;
use uuid::Uuid;

use crate::chunk::{self, ChunkParams};
use crate::extract::ExtractText;
use crate::models::{AppState, Document};
use crate::progress::{IngestEvent, IngestProgressReporter};
use crate::store::StateStore;

/// One source that could not be ingested.
#[derive(Debug)]
pub struct IngestFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub added: u64,
    pub chunks_written: u64,
    pub failed: Vec<IngestFailure>,
}

/// Ingest `sources` into `state`, persisting after every document.
///
/// Returns the final state snapshot together with the batch report. A
/// source whose name collides with an existing document still gets a fresh
/// document with a new id; nothing is deduplicated or replaced.
pub async fn ingest_batch(
    store: &StateStore,
    mut state: AppState,
    sources: &[PathBuf],
    extractor: &dyn ExtractText,
    params: ChunkParams,
    reporter: &dyn IngestProgressReporter,
) -> Result<(AppState, IngestReport)> {
    let total = sources.len() as u64;
    let mut report = IngestReport::default();

    for (i, source) in sources.iter().enumerate() {
        let n = i as u64 + 1;
        let name = source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());

        let text = match extractor.extract(source) {
            Ok(text) => text,
            Err(e) => {
                warn!("skipping {name}: {e:#}");
                reporter.report(IngestEvent::Failed {
                    name: name.clone(),
                    error: format!("{e:#}"),
                    n,
                    total,
                });
                report.failed.push(IngestFailure {
                    name,
                    error: format!("{e:#}"),
                });
                continue;
            }
        };

        let chunks = chunk::chunk_sentences(&text, params);
        let chunk_count = chunks.len() as u64;
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            name: name.clone(),
            chunks,
        };

        state = state.with_file(doc);
        store.save(&state).await?;

        report.added += 1;
        report.chunks_written += chunk_count;
        reporter.report(IngestEvent::Ingested { name, n, total });
    }

    Ok((state, report))
}
