use std::io::Write;
use std::path::Path;

use super::filter::{matching_rows, Selection};
use super::model::{MetadataTable, ReferenceSet};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Metadata export
// ---------------------------------------------------------------------------

/// Write the header plus every matching row to `path`.
///
/// Returns the number of data rows written. Zero is a valid outcome and
/// produces a header-only file.
pub fn export_metadata(
    path: &Path,
    metadata: &MetadataTable,
    selection: &Selection,
) -> Result<usize> {
    let mut buf = Vec::new();
    let n = write_metadata(&mut buf, metadata, selection).map_err(|e| Error::io(path, e))?;
    std::fs::write(path, buf).map_err(|e| Error::io(path, e))?;
    log::info!("Exported {n} metadata rows to {}", path.display());
    Ok(n)
}

/// Serialize the filtered table. Row and column order follow the source.
pub fn write_metadata<W: Write>(
    out: W,
    metadata: &MetadataTable,
    selection: &Selection,
) -> std::io::Result<usize> {
    let rows = matching_rows(metadata, selection);

    let quote_style = if metadata.uses_quoting() {
        csv::QuoteStyle::Necessary
    } else {
        csv::QuoteStyle::Never
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(metadata.delimiter)
        .quote_style(quote_style)
        .from_writer(out);

    if !metadata.headers.is_empty() {
        writer.write_record(&metadata.headers)?;
    }
    for &idx in &rows {
        writer.write_record(&metadata.rows[idx])?;
    }
    writer.flush()?;
    Ok(rows.len())
}

// ---------------------------------------------------------------------------
// Reference export
// ---------------------------------------------------------------------------

/// Write the selected ASVs as FASTA, in reference order.
pub fn export_reference(
    path: &Path,
    reference: &ReferenceSet,
    selection: &Selection,
) -> Result<usize> {
    let mut buf = Vec::new();
    let n = write_reference(&mut buf, reference, selection).map_err(|e| Error::io(path, e))?;
    std::fs::write(path, buf).map_err(|e| Error::io(path, e))?;
    log::info!("Exported {n} reference sequences to {}", path.display());
    Ok(n)
}

pub fn write_reference<W: Write>(
    mut out: W,
    reference: &ReferenceSet,
    selection: &Selection,
) -> std::io::Result<usize> {
    let mut n = 0;
    for record in reference.records() {
        if !selection.identifiers.contains(&record.id) {
            continue;
        }
        out.write_all(b">")?;
        out.write_all(record.id.as_bytes())?;
        out.write_all(b"\n")?;
        out.write_all(&record.seq)?;
        out.write_all(b"\n")?;
        n += 1;
    }
    out.flush()?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// ASV lengths table
// ---------------------------------------------------------------------------

/// Write `ASV,Length` for every reference record.
pub fn export_lengths(path: &Path, reference: &ReferenceSet) -> Result<usize> {
    let mut buf = Vec::new();
    write_lengths(&mut buf, reference).map_err(|e| Error::io(path, e))?;
    std::fs::write(path, buf).map_err(|e| Error::io(path, e))?;
    log::info!("Wrote lengths of {} ASVs to {}", reference.len(), path.display());
    Ok(reference.len())
}

pub fn write_lengths<W: Write>(out: W, reference: &ReferenceSet) -> std::io::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["ASV", "Length"])?;
    for record in reference.records() {
        let len = record.len().to_string();
        writer.write_record([record.id.as_str(), len.as_str()])?;
    }
    writer.flush()
}
