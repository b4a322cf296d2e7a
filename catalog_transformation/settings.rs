use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;

fn default_raw_path() -> String {
    "data/raw/techtransfer_catalog.json".to_string()
}

fn default_processed_path() -> String {
    "data/processed/techtransfer_catalog.csv".to_string()
}

/// Transformation settings, read from TECHTRANSFER_* environment variables.
#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_raw_path")]
    pub raw_path: String,
    #[serde(default = "default_processed_path")]
    pub processed_path: String,
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_paths_pair_up() {
        assert!(default_raw_path().ends_with(".json"));
        assert!(default_processed_path().ends_with(".csv"));
    }
}
