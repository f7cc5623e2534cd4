use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::cleaner::{self, CleanReport};
use super::loader::{self, CACHE_NULL_TOKENS};
use super::model::{CellValue, JobTable};
use crate::error::DataError;

/// Where a loaded table came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    /// Read back from an earlier run's cleaned file.
    Cache,
    /// Cleaned from the raw export in this run.
    Raw(CleanReport),
}

/// Return the cleaned table, from the cache when possible.
///
/// The raw file must exist even on a cache hit; its absence is fatal. An
/// unreadable cache is rebuilt, a failed cache write only logged.
pub fn load_or_clean(raw_path: &Path, cache_path: &Path, rebuild: bool) -> Result<(JobTable, Origin)> {
    if !raw_path.exists() {
        return Err(DataError::MissingInput(raw_path.to_path_buf()).into());
    }

    if !rebuild && cache_path.exists() {
        match read_cache(cache_path) {
            Ok(table) => {
                log::info!(
                    "Using cleaned cache {} ({} rows)",
                    cache_path.display(),
                    table.len()
                );
                return Ok((table, Origin::Cache));
            }
            Err(e) => log::warn!("Ignoring unreadable cache {}: {e:#}", cache_path.display()),
        }
    }

    let raw = loader::load_file(raw_path)?;
    let (table, report) = cleaner::clean(raw);
    if let Err(e) = write_cache(cache_path, &table) {
        log::warn!("Could not write cache {}: {e:#}", cache_path.display());
    }
    Ok((table, Origin::Raw(report)))
}

/// Read a cleaned table written by [`write_cache`].
pub fn read_cache(path: &Path) -> Result<JobTable> {
    let raw = loader::read_table(path, CACHE_NULL_TOKENS)?;
    let table = JobTable::from_raw(&raw)
        .with_context(|| format!("decoding cache {}", path.display()))?;
    Ok(table)
}

/// Persist the cleaned table. Dispatch by extension (`.csv`, `.parquet`).
/// Concurrent writers are not coordinated; the last one wins.
pub fn write_cache(path: &Path, table: &JobTable) -> Result<()> {
    match loader::extension(path).as_str() {
        "csv" => write_csv(path, table),
        "parquet" | "pq" => write_parquet(path, table),
        other => Err(DataError::UnsupportedFormat(other.to_string()).into()),
    }?;
    log::info!("Wrote {} cleaned rows to {}", table.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

fn write_csv(path: &Path, table: &JobTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV {}", path.display()))?;
    writer
        .write_record(table.column_names())
        .context("writing CSV header")?;
    for (i, p) in table.postings.iter().enumerate() {
        writer
            .write_record(table.cells(p).iter().map(|c| c.to_string()))
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

fn write_parquet(path: &Path, table: &JobTable) -> Result<()> {
    let names = table.column_names();
    let mut columns: Vec<Vec<CellValue>> = vec![Vec::with_capacity(table.len()); names.len()];
    for p in &table.postings {
        for (column, value) in columns.iter_mut().zip(table.cells(p)) {
            column.push(value);
        }
    }

    let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = names
        .iter()
        .zip(&columns)
        .map(|(name, cells)| {
            let (data_type, array) = cells_to_array(cells);
            (Field::new(name, data_type, true), array)
        })
        .unzip();

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating parquet file {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Pick the narrowest Arrow type that holds every non-null cell: Int64,
/// then Float64, then Boolean, otherwise Utf8 text.
fn cells_to_array(cells: &[CellValue]) -> (DataType, ArrayRef) {
    let non_null = || cells.iter().filter(|c| !c.is_null());
    let has_values = non_null().next().is_some();

    if has_values && non_null().all(|c| matches!(c, CellValue::Integer(_))) {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Integer(i) => Some(*i),
                _ => None,
            })
            .collect();
        return (DataType::Int64, Arc::new(Int64Array::from(values)));
    }
    if has_values
        && non_null().all(|c| matches!(c, CellValue::Integer(_) | CellValue::Float(_)))
    {
        let values: Vec<Option<f64>> = cells.iter().map(CellValue::as_f64).collect();
        return (DataType::Float64, Arc::new(Float64Array::from(values)));
    }
    if has_values && non_null().all(|c| matches!(c, CellValue::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return (DataType::Boolean, Arc::new(BooleanArray::from(values)));
    }
    let values: Vec<Option<String>> = cells.iter().map(CellValue::as_text).collect();
    (DataType::Utf8, Arc::new(StringArray::from(values)))
}
