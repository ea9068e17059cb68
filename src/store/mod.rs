//! Versioned, encrypted persistence of [`AppState`].
//!
//! The whole state serializes to one JSON document stored under a single
//! named slot. [`StateSlot`] abstracts the slot itself (get/set/delete a
//! string); [`StateStore`] layers the domain rules on top: schema migration
//! on load, API-key encryption on save, and delete-on-empty so a reset
//! cannot be resurrected by a stale record.

mod fs;
mod memory;

pub use fs::FileSlot;
pub use memory::MemorySlot;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::crypto;
use crate::migrate::migrate_state;
use crate::models::AppState;

/// Name of the single storage slot holding the serialized state.
pub const STATE_SLOT_KEY: &str = "raginfo-state";

/// One named storage slot holding at most one string value.
///
/// Implementations own the physical medium; the store never sees paths or
/// files, only the slot contract.
#[async_trait]
pub trait StateSlot: Send + Sync {
    /// Read the current value, or `None` if the slot has never been written
    /// (or has been deleted).
    async fn get(&self) -> Result<Option<String>>;

    /// Replace the slot's value.
    async fn set(&self, value: &str) -> Result<()>;

    /// Remove the slot. Deleting an absent slot is not an error.
    async fn delete(&self) -> Result<()>;
}

/// Loads and saves [`AppState`] through a [`StateSlot`], applying migration
/// and at-rest encryption of the API key.
#[derive(Clone)]
pub struct StateStore {
    slot: Arc<dyn StateSlot>,
}

impl StateStore {
    pub fn new(slot: Arc<dyn StateSlot>) -> Self {
        Self { slot }
    }

    /// Load the persisted state.
    ///
    /// An absent slot yields the default-empty state, as does a value that
    /// is not JSON at all (logged). Readable JSON is migrated to the
    /// current schema and its API key decrypted; a key that fails to
    /// decrypt is kept as-is, covering records written before encryption
    /// existed.
    pub async fn load(&self) -> Result<AppState> {
        let Some(raw) = self.slot.get().await? else {
            return Ok(AppState::default());
        };
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("persisted state is not valid JSON, starting empty: {e}");
                return Ok(AppState::default());
            }
        };
        let mut state = migrate_state(value);
        state.settings.api_key = crypto::decrypt(&state.settings.api_key);
        Ok(state)
    }

    /// Persist a state snapshot.
    ///
    /// The default-empty state deletes the slot instead of writing a
    /// record. Otherwise the snapshot is serialized with the API key
    /// encrypted; the in-memory snapshot is left untouched.
    pub async fn save(&self, state: &AppState) -> Result<()> {
        if state.is_empty() {
            return self.slot.delete().await;
        }
        let mut persisted = state.clone();
        if !persisted.settings.api_key.is_empty() {
            persisted.settings.api_key = crypto::encrypt(&persisted.settings.api_key);
        }
        let raw = serde_json::to_string(&persisted)?;
        self.slot.set(&raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chat, Document, Settings};

    fn store() -> (StateStore, Arc<MemorySlot>) {
        let slot = Arc::new(MemorySlot::default());
        (StateStore::new(slot.clone()), slot)
    }

    fn sample_doc() -> Document {
        Document {
            id: "d1".to_string(),
            name: "notes.txt".to_string(),
            chunks: vec!["chunk one".to_string(), "chunk two".to_string()],
        }
    }

    #[tokio::test]
    async fn load_absent_slot_yields_default() {
        let (store, _) = store();
        assert_eq!(store.load().await.unwrap(), AppState::default());
    }

    #[tokio::test]
    async fn save_empty_state_deletes_the_record() {
        let (store, slot) = store();
        let state = AppState::default().with_file(sample_doc());
        store.save(&state).await.unwrap();
        assert!(slot.contents().await.is_some());

        store.save(&AppState::default()).await.unwrap();
        assert!(slot.contents().await.is_none());
    }

    #[tokio::test]
    async fn api_key_roundtrips_but_is_not_persisted_in_cleartext() {
        let (store, slot) = store();
        let state = AppState::default().with_settings(Settings {
            api_key: "sk-123".to_string(),
            model: crate::models::DEFAULT_MODEL.to_string(),
        });
        store.save(&state).await.unwrap();

        let raw = slot.contents().await.unwrap();
        assert!(!raw.contains("sk-123"), "plaintext key leaked: {raw}");

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.settings.api_key, "sk-123");
    }

    #[tokio::test]
    async fn documents_and_chats_survive_a_roundtrip() {
        let (store, _) = store();
        let state = AppState::default().with_file(sample_doc()).with_chat(Chat {
            id: "c1".to_string(),
            user_query: "what?".to_string(),
            ai_response: "that.".to_string(),
        });
        store.save(&state).await.unwrap();
        assert_eq!(store.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn legacy_plaintext_api_key_loads_unchanged() {
        let (store, slot) = store();
        slot.set(r#"{"settings":{"apiKey":"legacy-plain-key","model":"gemini-pro"},"files":[],"chats":[{"id":"c","userQuery":"q","aiResponse":"a"}]}"#)
            .await
            .unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.settings.api_key, "legacy-plain-key");
        assert_eq!(loaded.settings.model, "gemini-pro");
    }

    #[tokio::test]
    async fn legacy_full_text_documents_are_migrated_on_load() {
        let (store, slot) = store();
        slot.set(r#"{"files":[{"id":"old","name":"o.txt","text":"One sentence. Another one."}],"chats":[]}"#)
            .await
            .unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.files.len(), 1);
        assert!(!loaded.files[0].chunks.is_empty());
    }

    #[tokio::test]
    async fn corrupt_record_loads_as_default() {
        let (store, slot) = store();
        slot.set("{ this is not json").await.unwrap();
        assert_eq!(store.load().await.unwrap(), AppState::default());
    }

    #[tokio::test]
    async fn save_does_not_mutate_the_snapshot() {
        let (store, _) = store();
        let state = AppState::default().with_settings(Settings {
            api_key: "sk-123".to_string(),
            model: crate::models::DEFAULT_MODEL.to_string(),
        });
        store.save(&state).await.unwrap();
        assert_eq!(state.settings.api_key, "sk-123");
    }
}
