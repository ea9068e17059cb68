//! In-memory slot, used by unit tests and as the simplest [`StateSlot`]
//! reference implementation.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StateSlot;

/// A [`StateSlot`] backed by process memory. Contents vanish when the
/// value is dropped.
#[derive(Default)]
pub struct MemorySlot {
    value: RwLock<Option<String>>,
}

impl MemorySlot {
    /// Current raw contents, for assertions on the persisted form.
    pub async fn contents(&self) -> Option<String> {
        self.value.read().await.clone()
    }
}

#[async_trait]
impl StateSlot for MemorySlot {
    async fn get(&self) -> Result<Option<String>> {
        Ok(self.value.read().await.clone())
    }

    async fn set(&self, value: &str) -> Result<()> {
        *self.value.write().await = Some(value.to_string());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        *self.value.write().await = None;
        Ok(())
    }
}
