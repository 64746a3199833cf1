use std::path::Path;

use anyhow::{Context, Result};

use super::model::Table;

/// Serialize a table as CSV text: header, then rows, no index column.
pub fn to_csv_string(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .context("writing CSV header")?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_field()))
            .context("writing CSV row")?;
    }
    let bytes = writer.into_inner().context("flushing CSV")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

/// Write the CSV serialization of `table` to `path`.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let text = to_csv_string(table)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}
