//! Schema migration for loaded state blobs.
//!
//! The persisted JSON has drifted across application versions: documents
//! used to carry a single full-text `text` field instead of a `chunks`
//! sequence, and early records can miss top-level fields entirely. This
//! module rewrites any of those shapes into the current [`AppState`] in one
//! pure pass, so the rest of the crate only ever sees the current shape.
//!
//! Migration never fails: unreadable top-level structure yields the
//! default-empty state, and individually malformed documents or chats are
//! skipped with a warning rather than poisoning the whole load.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::chunk::{self, ChunkParams};
use crate::models::{AppState, Chat, Document, Settings};

/// Top-level record with every field optional, tolerating early versions
/// that persisted only a subset.
#[derive(Deserialize)]
struct RawState {
    #[serde(default)]
    settings: Value,
    #[serde(default)]
    files: Vec<Value>,
    #[serde(default)]
    chats: Vec<Value>,
}

/// The two document shapes seen in the wild, resolved once at this
/// boundary.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Current {
        id: String,
        name: String,
        chunks: Vec<String>,
    },
    /// Pre-chunking shape: one full-text field per document.
    Legacy {
        id: String,
        name: String,
        text: String,
    },
}

/// Rewrite a freshly loaded, untyped state blob into the current shape.
///
/// Legacy full-text documents are run through the chunking engine with
/// default parameters; missing top-level fields become empty defaults.
/// Pure: touches no storage.
pub fn migrate_state(raw: Value) -> AppState {
    let raw: RawState = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            warn!("persisted state has unreadable structure, starting empty: {e}");
            return AppState::default();
        }
    };

    let settings: Settings = match serde_json::from_value(raw.settings) {
        Ok(s) => s,
        Err(_) => Settings::default(),
    };

    let mut files = Vec::with_capacity(raw.files.len());
    for value in raw.files {
        match serde_json::from_value::<StoredDocument>(value) {
            Ok(StoredDocument::Current { id, name, chunks }) => {
                files.push(Document { id, name, chunks });
            }
            Ok(StoredDocument::Legacy { id, name, text }) => {
                let chunks = chunk::chunk_sentences(&text, ChunkParams::default());
                files.push(Document { id, name, chunks });
            }
            Err(e) => warn!("skipping unreadable document record: {e}"),
        }
    }

    let mut chats = Vec::with_capacity(raw.chats.len());
    for value in raw.chats {
        match serde_json::from_value::<Chat>(value) {
            Ok(chat) => chats.push(chat),
            Err(e) => warn!("skipping unreadable chat record: {e}"),
        }
    }

    AppState {
        settings,
        files,
        chats,
    }
}
