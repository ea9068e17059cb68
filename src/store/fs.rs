//! Filesystem-backed slot: one JSON file in the configured data directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;

use super::{StateSlot, STATE_SLOT_KEY};

/// A [`StateSlot`] stored as `<dir>/raginfo-state.json`. The directory is
/// created on first write.
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STATE_SLOT_KEY}.json")),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateSlot for FileSlot {
    async fn get(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read state file {}", self.path.display()))
            }
        }
    }

    async fn set(&self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create data directory {}", parent.display()))?;
        }
        fs::write(&self.path, value)
            .await
            .with_context(|| format!("failed to write state file {}", self.path.display()))
    }

    async fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("failed to delete state file {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn file_slot_lifecycle() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path().join("nested"));

        assert_eq!(slot.get().await.unwrap(), None);

        slot.set(r#"{"files":[]}"#).await.unwrap();
        assert!(slot.path().exists());
        assert_eq!(
            slot.get().await.unwrap().as_deref(),
            Some(r#"{"files":[]}"#)
        );

        slot.delete().await.unwrap();
        assert!(!slot.path().exists());
        assert_eq!(slot.get().await.unwrap(), None);

        slot.delete().await.unwrap();
    }

    #[tokio::test]
    async fn file_name_is_the_slot_key() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path());
        assert!(slot.path().ends_with("raginfo-state.json"));
    }
}
