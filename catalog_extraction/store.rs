use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::info;

/// Write the aggregated records as a pretty-printed JSON array (4-space
/// indent, matching the upstream artifact format). The parent directory
/// must already exist.
pub fn save_raw(records: &[Value], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    records
        .serialize(&mut ser)
        .with_context(|| format!("Failed to write {:?}", path))?;
    writer.flush()?;
    info!(records = records.len(), "Raw data saved to {:?}", path);
    Ok(())
}
