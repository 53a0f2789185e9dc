//! Configuration loading and parsing
//!
//! Every section is optional; command-line arguments override file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Path or http(s) URL of the events JSON
    pub source: Option<String>,
    /// Request timeout for URL sources
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    20
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: None,
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CalendarConfig {
    /// IANA time zone name used for day boundaries (default UTC)
    pub timezone: Option<String>,
}

/// Default filters applied before command-line filters
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FiltersConfig {
    /// Page variant: "directory", "bay-area" or "new-england"
    pub profile: Option<String>,
    pub search: Option<String>,
    /// Date token: today, tomorrow, this-week, this-month, next-month
    pub date: Option<String>,
    /// all, online or in-person
    #[serde(rename = "type")]
    pub location: Option<String>,
    pub state: Option<String>,
    pub library: Option<String>,
    #[serde(default)]
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Txt,
    Html,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
