use crate::catalog::ColumnMapping;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Inference settings (can override CLI)
    pub ollama_url: Option<String>,
    pub model: Option<String>,
    pub timeout_sec: Option<u64>,
    pub call_delay_ms: Option<u64>,
    pub temperature: Option<f32>,

    // Dataset layout
    pub columns: Option<ColumnsConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ColumnsConfig {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track_id: Option<String>,
}

impl ColumnsConfig {
    /// Fills unset names from the defaults.
    pub fn into_mapping(self) -> ColumnMapping {
        let defaults = ColumnMapping::default();
        ColumnMapping {
            title: self.title.unwrap_or(defaults.title),
            artist: self.artist.unwrap_or(defaults.artist),
            album: self.album.unwrap_or(defaults.album),
            track_id: self.track_id.unwrap_or(defaults.track_id),
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
