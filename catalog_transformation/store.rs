use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::table::ProcessedTable;

/// Quote a field if it contains a delimiter, quote or line break.
fn csv_field(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write the processed table as comma-separated UTF-8 with a header row and
/// no index column. The parent directory must already exist.
pub fn save_processed(table: &ProcessedTable, path: &Path) -> Result<()> {
    let mut out = String::new();
    out.push_str(&table.columns.join(","));
    out.push('\n');
    for row in &table.rows {
        let fields: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("Failed to write {:?}", path))?;
    info!(rows = table.rows.len(), "Processed data saved to {:?}", path);
    Ok(())
}
