//! Spreadsheet IO errors.

use std::path::PathBuf;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Failure while decoding or encoding a workbook.
#[derive(Debug, Error)]
pub enum XlsxIoError {
    /// Workbook could not be opened or recognized.
    #[error("Failed to open workbook {}: {message}", .path.display())]
    Open {
        /// Source path (`<memory>` for byte input).
        path: PathBuf,
        /// Underlying decoder error text.
        message: String,
    },
    /// Workbook has no worksheets.
    #[error("Workbook has no worksheets.")]
    EmptyWorkbook,
    /// Requested worksheet does not exist.
    #[error("Sheet not found: {sheet_name:?} (available: {available:?})")]
    SheetNotFound {
        /// Requested name.
        sheet_name: String,
        /// Names present in the workbook.
        available: Vec<String>,
    },
    /// Worksheet cells could not be decoded.
    #[error("Failed to read sheet {sheet_name:?}: {message}")]
    Read {
        /// Sheet being read.
        sheet_name: String,
        /// Underlying decoder error text.
        message: String,
    },
    /// Encoder failure.
    #[error("xlsx write error: {0}")]
    Write(#[from] XlsxError),
    /// Row/column index outside the encoder's integer range.
    #[error("{0}")]
    IndexOverflow(String),
    /// Invalid call options.
    #[error("{0}")]
    InvalidOptions(String),
    /// Writer used after `close()`/`save_to_buffer()`.
    #[error("Cannot write after close().")]
    Closed,
}
