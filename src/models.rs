//! Core data models for the RagInfo knowledge base.
//!
//! [`AppState`] is the single unit of persistence: one snapshot holding the
//! user's documents, chat history, and settings. Snapshots are never mutated
//! in place; every mutation helper returns a new state, so callers always
//! hold a consistent view.

use serde::{Deserialize, Serialize};

/// Model used when none is configured, and the fixed fallback for the
/// query retry policy.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Model ids the settings commands accept.
pub const AVAILABLE_MODELS: &[&str] = &["gemini-1.5-flash-latest", "gemini-pro"];

/// Per-document ingestion size limit.
pub const MAX_FILE_SIZE_MB: u64 = 10;
pub const MAX_FILE_SIZE_BYTES: u64 = MAX_FILE_SIZE_MB * 1024 * 1024;

/// An ingested document: a name plus the ordered chunk sequence produced by
/// one chunking pass. Re-ingesting a file with the same name creates a new
/// document with a fresh id rather than mutating an existing one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub chunks: Vec<String>,
}

/// One question/answer exchange. Append-only; no invariants beyond `id`
/// uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub user_query: String,
    pub ai_response: String,
}

/// User settings. `api_key` is plaintext in memory; only the persisted
/// representation is encrypted (see [`crate::store::StateStore`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// The whole application state. Serialized as one JSON object under a
/// single named storage slot.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppState {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub files: Vec<Document>,
    #[serde(default)]
    pub chats: Vec<Chat>,
}

impl AppState {
    /// True for the default-empty state: no files, no chats, no API key.
    ///
    /// Saving an empty state deletes the persisted record instead of
    /// writing, so an explicit reset cannot be resurrected by a stale
    /// record from a previous session.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.chats.is_empty() && self.settings.api_key.is_empty()
    }

    pub fn with_file(mut self, doc: Document) -> Self {
        self.files.push(doc);
        self
    }

    pub fn without_file(mut self, id: &str) -> Self {
        self.files.retain(|f| f.id != id);
        self
    }

    pub fn with_chat(mut self, chat: Chat) -> Self {
        self.chats.push(chat);
        self
    }

    pub fn without_chat(mut self, id: &str) -> Self {
        self.chats.retain(|c| c.id != id);
        self
    }

    /// Settings are replaced wholesale, never merged field-by-field.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
}
