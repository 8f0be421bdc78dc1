//! Workbook decoding into a row-major grid.
//!
//! Rows start at the first used cell of the sheet's used range. Trailing
//! blank cells are trimmed from each row, so rows may be shorter than the
//! header.

use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use pdukit_table::{EnumCellValue, Grid};
use tracing::debug;

use crate::error::XlsxIoError;
use crate::spec::SpecXlsxReadOptions;

/// Read one sheet of the workbook at `path` (XLSX/XLSM/XLSB/XLS/ODS).
///
/// # Errors
/// [`XlsxIoError::Open`], [`XlsxIoError::EmptyWorkbook`],
/// [`XlsxIoError::SheetNotFound`] or [`XlsxIoError::Read`].
pub fn read_grid_from_path(
    path: impl AsRef<Path>,
    options: &SpecXlsxReadOptions,
) -> Result<Grid, XlsxIoError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening workbook");
    let mut workbook = open_workbook_auto(path).map_err(|err| XlsxIoError::Open {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    read_grid_from_workbook(&mut workbook, options)
}

/// Read one sheet of an in-memory workbook.
///
/// # Errors
/// Same as [`read_grid_from_path`].
pub fn read_grid_from_bytes(
    bytes: &[u8],
    options: &SpecXlsxReadOptions,
) -> Result<Grid, XlsxIoError> {
    debug!(n_bytes = bytes.len(), "opening in-memory workbook");
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|err| {
            XlsxIoError::Open {
                path: PathBuf::from("<memory>"),
                message: err.to_string(),
            }
        })?;
    read_grid_from_workbook(&mut workbook, options)
}

fn read_grid_from_workbook<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    options: &SpecXlsxReadOptions,
) -> Result<Grid, XlsxIoError> {
    let l_sheet_names = workbook.sheet_names();
    let sheet_name = match &options.sheet_name {
        Some(name) if l_sheet_names.contains(name) => name.clone(),
        Some(name) => {
            return Err(XlsxIoError::SheetNotFound {
                sheet_name: name.clone(),
                available: l_sheet_names,
            });
        }
        None => l_sheet_names
            .first()
            .cloned()
            .ok_or(XlsxIoError::EmptyWorkbook)?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|err| XlsxIoError::Read {
            sheet_name: sheet_name.clone(),
            message: err.to_string(),
        })?;

    let grid = derive_grid_from_range(&range, options.if_skip_blank_rows);
    debug!(
        sheet = %sheet_name,
        n_rows = grid.len(),
        n_cols_header = grid.first().map_or(0, Vec::len),
        "sheet decoded"
    );
    Ok(grid)
}

/// Decode `range` into a grid anchored at A1.
///
/// The used range may start below or right of A1; the skipped rows and
/// columns are restored as blanks so column positions match the sheet.
fn derive_grid_from_range(range: &Range<Data>, if_skip_blank_rows: bool) -> Grid {
    let Some((n_row_start, n_col_start)) = range.start() else {
        return Vec::new();
    };
    let n_rows_leading = n_row_start as usize;
    let n_cols_leading = n_col_start as usize;

    let mut grid = Vec::with_capacity(n_rows_leading + range.height());
    if !if_skip_blank_rows {
        grid.extend((0..n_rows_leading).map(|_| Vec::new()));
    }
    for row in range.rows() {
        let mut row_out: Vec<EnumCellValue> = Vec::with_capacity(n_cols_leading + row.len());
        row_out.extend((0..n_cols_leading).map(|_| EnumCellValue::None));
        row_out.extend(row.iter().map(derive_cell_value_from_data));
        while row_out.last().is_some_and(EnumCellValue::is_blank) {
            row_out.pop();
        }
        if if_skip_blank_rows && row_out.is_empty() {
            continue;
        }
        grid.push(row_out);
    }
    grid
}

fn derive_cell_value_from_data(value: &Data) -> EnumCellValue {
    match value {
        Data::Empty | Data::Error(_) => EnumCellValue::None,
        Data::String(val) | Data::DateTimeIso(val) | Data::DurationIso(val) => {
            EnumCellValue::String(val.clone())
        }
        Data::Int(val) => EnumCellValue::Number(*val as f64),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Bool(true) => EnumCellValue::from("true"),
        Data::Bool(false) => EnumCellValue::None,
        Data::DateTime(val) => EnumCellValue::Number(val.as_f64()),
    }
}
