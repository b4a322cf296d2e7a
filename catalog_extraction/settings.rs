use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;

fn default_base_url() -> String {
    "https://api.nasa.gov/techtransfer/software/data/".to_string()
}

fn default_search() -> String {
    "engine".to_string()
}

fn default_raw_path() -> String {
    "data/raw/techtransfer_catalog.json".to_string()
}

/// Extraction settings, read from TECHTRANSFER_* environment variables.
#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_search")]
    pub search: String,
    #[serde(default = "default_raw_path")]
    pub raw_path: String,
}

impl Settings {
    pub fn load() -> Result<Settings> {
        Config::builder()
            .add_source(config::Environment::with_prefix("TECHTRANSFER"))
            .build()
            .context("Failed to read environment settings")?
            .try_deserialize()
            .context("Failed to deserialize settings")
    }

    /// Endpoint carrying the search term and API key; the fetcher appends
    /// the page parameter.
    pub fn endpoint(&self) -> String {
        format!("{}?{}&api_key={}", self.base_url, self.search, self.api_key)
    }
}
