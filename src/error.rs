use std::path::PathBuf;

use thiserror::Error;

/// Failures of the data layer that callers may want to tell apart.
///
/// Everything else (I/O, CSV, Arrow) travels as `anyhow::Error` with context.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("cached row {row}: {message}")]
    MalformedCacheRow { row: usize, message: String },
}
