//! `pdukit_io_xlsx` v1:
//! Spreadsheet decode/encode for `pdukit` grids.
//!
//! Module layout:
//! - `conf`   : Excel limits and default format presets
//! - `spec`   : formats, read/write options and reports
//! - `error`  : error type shared by reader and writer
//! - `util`   : pure helper functions
//! - `reader` : workbook → grid (calamine)
//! - `writer` : grid → workbook (rust_xlsxwriter)
pub mod conf;
pub mod error;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_SHEET_NAME_DEFAULT, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL, derive_default_xlsx_formats,
};
pub use error::XlsxIoError;
pub use reader::{read_grid_from_bytes, read_grid_from_path};
pub use spec::{
    EnumAutofitColumnsRule, SpecAutofitCellsPolicy, SpecCellFormat, SpecSheetSlice,
    SpecXlsxFormatSet, SpecXlsxReadOptions, SpecXlsxReport, SpecXlsxWriteOptions,
};
pub use util::{plan_sheet_slices, sanitize_sheet_name};
pub use writer::{SpecXlsxSheetWriteOptions, XlsxWriter};
