//! XLSX constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecXlsxFormatSet};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Sheet name used for processed output.
pub const C_SHEET_NAME_DEFAULT: &str = "Processed_Data";

/// Build default format presets used by [`crate::writer::XlsxWriter`].
pub fn derive_default_xlsx_formats() -> SpecXlsxFormatSet {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some("Arial".to_string()),
        font_size: Some(11),
        align: Some("left".to_string()),
        valign: Some("top".to_string()),
        ..Default::default()
    };

    SpecXlsxFormatSet {
        text: cfg_base_fmt_spec.clone(),
        integer: cfg_base_fmt_spec.with_(SpecCellFormat {
            num_format: Some("0".to_string()),
            align: Some("center".to_string()),
            ..Default::default()
        }),
        header: cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            align: Some("center".to_string()),
            bg_color: Some("#F4F4F4".to_string()),
            border: Some(1),
            ..Default::default()
        }),
    }
}
