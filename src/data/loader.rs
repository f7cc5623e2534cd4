use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{CellValue, RawTable, Row};
use crate::error::DataError;

/// Cell texts read as null in the raw export, matching what a pandas
/// `read_csv` treats as missing by default.
pub const RAW_NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Only empty cells are null in files this crate wrote itself. Parquet text
/// cells use the same rule, so an empty string never survives loading.
pub const CACHE_NULL_TOKENS: &[&str] = &[""];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the raw job-postings export.  Dispatch by extension.
///
/// A missing file is reported as [`DataError::MissingInput`] so the caller
/// can stop before doing anything else.
///
/// Supported formats:
/// * `.csv`     – header row, one posting per record
/// * `.parquet` – flat columns (strings, ints, floats, bools)
pub fn load_file(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(DataError::MissingInput(path.to_path_buf()).into());
    }
    let table = read_table(path, RAW_NULL_TOKENS)?;
    log::info!(
        "Read {} raw rows with {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

/// Read any supported tabular file into an untyped table.
pub(crate) fn read_table(path: &Path, null_tokens: &[&str]) -> Result<RawTable> {
    match extension(path).as_str() {
        "csv" => load_csv(path, null_tokens),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedFormat(other.to_string()).into()),
    }
}

pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every other row one record.
/// Cells are kept as text; numeric coercion is the cleaner's job. Short
/// records are tolerated and their trailing cells read as null.
fn load_csv(path: &Path, null_tokens: &[&str]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: Row = columns
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), text_cell(value, null_tokens)))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

fn text_cell(value: &str, null_tokens: &[&str]) -> CellValue {
    if null_tokens.contains(&value) {
        CellValue::Null
    } else {
        CellValue::String(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file. Every column becomes one cell per row; nested
/// or exotic types are rendered to their display text.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening parquet file {}", path.display()))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells: Row = columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), extract_cell(batch.column(i), row)))
                .collect();
            rows.push(cells);
        }
    }

    Ok(RawTable { columns, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    let typed = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| text_cell(a.value(row), CACHE_NULL_TOKENS)),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| text_cell(a.value(row), CACHE_NULL_TOKENS)),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row))),
        _ => None,
    };
    typed.unwrap_or_else(|| {
        array_value_to_string(col.as_ref(), row)
            .map(CellValue::String)
            .unwrap_or(CellValue::Null)
    })
}
