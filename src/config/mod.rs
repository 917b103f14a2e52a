mod file_config;

pub use file_config::{ColumnsConfig, FileConfig};

use crate::catalog::ColumnMapping;
use anyhow::{bail, Result};
use std::time::Duration;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "deepseek-r1:14b";
pub const DEFAULT_TIMEOUT_SEC: u64 = 60;
pub const DEFAULT_CALL_DELAY_MS: u64 = 1000;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub ollama_url: String,
    pub model: String,
    pub timeout_sec: u64,
    pub call_delay_ms: u64,
    pub temperature: Option<f32>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_sec: DEFAULT_TIMEOUT_SEC,
            call_delay_ms: DEFAULT_CALL_DELAY_MS,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ollama_url: String,
    pub model: String,
    pub timeout: Duration,
    pub call_delay: Duration,
    pub temperature: Option<f32>,
    pub columns: ColumnMapping,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let ollama_url = file
            .ollama_url
            .unwrap_or_else(|| cli.ollama_url.clone());
        if ollama_url.trim().is_empty() {
            bail!("ollama_url must not be empty");
        }

        let model = file.model.unwrap_or_else(|| cli.model.clone());
        if model.trim().is_empty() {
            bail!("model must not be empty");
        }

        let timeout_sec = file.timeout_sec.unwrap_or(cli.timeout_sec);
        if timeout_sec == 0 {
            bail!("timeout_sec must be greater than zero");
        }

        let call_delay_ms = file.call_delay_ms.unwrap_or(cli.call_delay_ms);
        let temperature = file.temperature.or(cli.temperature);
        if let Some(t) = temperature {
            if !(0.0..=2.0).contains(&t) {
                bail!("temperature must be between 0.0 and 2.0, got {}", t);
            }
        }

        let columns = file.columns.unwrap_or_default().into_mapping();

        Ok(Self {
            ollama_url,
            model,
            timeout: Duration::from_secs(timeout_sec),
            call_delay: Duration::from_millis(call_delay_ms),
            temperature,
            columns,
        })
    }
}
