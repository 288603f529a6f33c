use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Roster;

/// Suggested file name for the download action.
pub const DEFAULT_EXPORT_NAME: &str = "filtered_providers.csv";

/// Write the selected providers as UTF-8 CSV with a header row.
///
/// Columns are the source columns in source order. Derived fields (clean
/// employment type, tag set) are never written.
pub fn write_csv<W: Write>(roster: &Roster, indices: &[usize], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&roster.columns)
        .context("writing CSV header")?;

    for &i in indices {
        let record = roster
            .records
            .get(i)
            .with_context(|| format!("row {i} is out of range"))?;
        out.write_record(roster.columns.iter().map(|col| record.field(col).to_string()))
            .with_context(|| format!("writing row {i}"))?;
    }

    out.flush().context("flushing CSV")?;
    Ok(())
}

/// In-memory export, e.g. for a clipboard or a download buffer.
pub fn to_csv_bytes(roster: &Roster, indices: &[usize]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(roster, indices, &mut buf)?;
    Ok(buf)
}

/// Export straight to a file on disk.
pub fn export_to_path(roster: &Roster, indices: &[usize], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(roster, indices, std::io::BufWriter::new(file))?;
    log::info!("Exported {} providers to {}", indices.len(), path.display());
    Ok(())
}
