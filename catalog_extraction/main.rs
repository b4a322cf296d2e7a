mod api;
mod settings;
mod store;

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = settings::Settings::load()?;
    info!(raw_path = %settings.raw_path, "Starting catalog extraction");

    println!("TechTransfer Catalog Extraction");
    println!("===============================\n");

    let client = api::build_client()?;
    let endpoint = settings.endpoint();
    let raw_path = PathBuf::from(&settings.raw_path);

    let records = api::get_catalog_data(&raw_path, api::PAGE_LIMIT, |page| {
        api::fetch_page(&client, &endpoint, page)
    })?;

    println!("Fetched {} records -> {}", records.len(), settings.raw_path);
    println!("\nDone.");
    Ok(())
}
