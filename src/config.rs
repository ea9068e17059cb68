use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::chunk::{DEFAULT_OVERLAP, DEFAULT_TARGET_SIZE};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_target_size")]
    pub target_size: usize,
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

fn default_target_size() -> usize {
    DEFAULT_TARGET_SIZE
}
fn default_overlap() -> usize {
    DEFAULT_OVERLAP
}

impl ChunkingConfig {
    pub fn params(&self) -> crate::chunk::ChunkParams {
        crate::chunk::ChunkParams {
            target_size: self.target_size,
            overlap: self.overlap,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate chunking
    if config.chunking.target_size == 0 {
        anyhow::bail!("chunking.target_size must be > 0");
    }
    if config.chunking.overlap >= config.chunking.target_size {
        anyhow::bail!("chunking.overlap must be < chunking.target_size");
    }

    Ok(config)
}

/// Load the config file if it exists, otherwise fall back to defaults. A
/// file that exists but fails to read or validate is still an error.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}
