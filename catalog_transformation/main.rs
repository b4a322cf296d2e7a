mod clean;
mod settings;
mod store;
mod table;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{error, info};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_raw(path: &Path) -> Result<Vec<Value>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Malformed raw data in {:?}", path))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = settings::Settings::load()?;
    info!(
        raw_path = %settings.raw_path,
        processed_path = %settings.processed_path,
        "Starting catalog transformation"
    );

    println!("TechTransfer Catalog Transformation");
    println!("===================================\n");

    let records = match load_raw(Path::new(&settings.raw_path)) {
        Ok(records) => records,
        Err(err) => {
            error!(%err, "Failed to load raw data");
            return Err(err);
        }
    };
    println!("Loaded {} raw records", records.len());

    let cleaned: Vec<Value> = records.iter().map(clean::clean_value).collect();
    info!(records = cleaned.len(), "Records cleaned");

    let today = chrono::Local::now().date_naive();
    let processed = match table::transform_records(&cleaned, today) {
        Ok(table) => table,
        Err(err) => {
            error!(%err, "Transformation failed");
            return Err(err.into());
        }
    };

    store::save_processed(&processed, Path::new(&settings.processed_path))?;

    println!(
        "Wrote {} rows -> {}",
        processed.rows.len(),
        settings.processed_path
    );
    println!("\nDone.");
    Ok(())
}
