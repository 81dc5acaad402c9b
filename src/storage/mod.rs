use crate::analysis::VacancyTable;
use crate::models::CSV_HEADER;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Write the table as CSV, replacing any existing file. The header row comes
/// from the record's column names; there is no index column.
pub fn write_csv(table: &VacancyTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    if table.is_empty() {
        // serialize() emits the header with the first record; an empty table
        // still gets one
        writer.write_record(CSV_HEADER)?;
    }
    for record in table.records() {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write row to {:?}", path))?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {:?}", table.len(), path);
    Ok(())
}
