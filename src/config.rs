//! Process configuration: loaded once before the first request, immutable
//! afterwards.
//!
//! Sources, later wins: built-in defaults, an optional TOML file
//! (explicit `--config` path, else `~/.config/healthsheet/config.toml`),
//! then environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::ReportError;

pub const DEFAULT_BASE_URL: &str = "https://api.poixe.com/v1";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const ENV_API_KEY: &str = "POIXE_API_KEY";
const ENV_BASE_URL: &str = "HEALTHSHEET_BASE_URL";
const ENV_MODEL: &str = "HEALTHSHEET_MODEL";
const ENV_SHEET_URL: &str = "SHEET_URL";
const ENV_SHEET_TOKEN: &str = "SHEET_TOKEN";

/// Resolved configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Model provider API key. May be empty; checked at request time.
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
    /// Spreadsheet append endpoint. None disables the sink.
    pub sheet_url: Option<String>,
    pub sheet_token: Option<String>,
    /// Append to the sheet after each successful report.
    pub auto_sync: bool,
}

/// Raw TOML shape; every key optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_key: Option<String>,
    api_base_url: Option<String>,
    model: Option<String>,
    sheet_url: Option<String>,
    sheet_token: Option<String>,
    auto_sync: Option<bool>,
}

impl AppConfig {
    /// Load configuration. An explicit path must exist and parse; the
    /// default path is used only when present.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ReportError> {
        let file = match explicit_path {
            Some(path) => read_file_config(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_file_config(&path)?,
                _ => FileConfig::default(),
            },
        };
        Ok(Self::from_sources(file, |key| std::env::var(key).ok()))
    }

    /// Merge file values under environment overrides. Factored out so the
    /// precedence rules are testable without touching the process env.
    fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        AppConfig {
            api_key: env(ENV_API_KEY).or(file.api_key).unwrap_or_default(),
            api_base_url: env(ENV_BASE_URL)
                .or(file.api_base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: env(ENV_MODEL)
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            sheet_url: env(ENV_SHEET_URL).or(file.sheet_url),
            sheet_token: env(ENV_SHEET_TOKEN).or(file.sheet_token),
            auto_sync: file.auto_sync.unwrap_or(true),
        }
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ReportError::Config(format!("failed to read config '{}': {}", path.display(), e))
    })?;
    let config = toml::from_str(&content).map_err(|e| {
        ReportError::Config(format!("invalid config '{}': {}", path.display(), e))
    })?;
    info!("Loaded config from '{}'", path.display());
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("healthsheet").join("config.toml"))
}
