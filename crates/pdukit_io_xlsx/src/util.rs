//! Stateless helper utilities used by the reader and writer.

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::error::XlsxIoError;
use crate::spec::{SpecSheetSlice, SpecXlsxReport};

////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Split a grid body into Excel-compliant sheet slices.
///
/// `height_data` excludes the header rows, which every slice repeats.
pub fn plan_sheet_slices(
    height_data: usize,
    width_data: usize,
    height_header: usize,
    sheet_name: &str,
    report: &mut SpecXlsxReport,
) -> Result<Vec<SpecSheetSlice>, XlsxIoError> {
    if height_header == 0 {
        return Err(XlsxIoError::InvalidOptions(
            "height_header must be >= 1.".to_string(),
        ));
    }

    let n_rows_data_max = N_NROWS_EXCEL_MAX.saturating_sub(height_header);
    if n_rows_data_max == 0 {
        return Err(XlsxIoError::InvalidOptions(format!(
            "Header too tall: height_header={height_header} exceeds Excel limit."
        )));
    }

    let l_col_slices = derive_bounded_ranges(width_data, N_NCOLS_EXCEL_MAX);
    let l_row_slices = derive_bounded_ranges(height_data, n_rows_data_max);
    let n_parts_total = l_col_slices.len() * l_row_slices.len();

    let mut l_sheet_parts = Vec::with_capacity(n_parts_total);
    let mut n_idx_part = 1;
    for (col_start, col_end) in &l_col_slices {
        for (row_start, row_end) in &l_row_slices {
            let c_part_sheet_name = if n_parts_total == 1 {
                sheet_name.to_string()
            } else {
                create_sheet_identifier(sheet_name, n_idx_part)
            };

            l_sheet_parts.push(SpecSheetSlice {
                sheet_name: c_part_sheet_name,
                row_start_inclusive: *row_start,
                row_end_exclusive: *row_end,
                col_start_inclusive: *col_start,
                col_end_exclusive: *col_end,
            });
            n_idx_part += 1;
        }
    }

    if n_parts_total > 1 {
        report.warn(format!(
            "Excel limit overflow: split into {} sheets (columns-first, then rows).",
            l_sheet_parts.len()
        ));
    }

    Ok(l_sheet_parts)
}

/// Create suffixed sheet name (`base_1`, `base_2`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_sheet_name_suffix = format!("_{part_idx_1based}");
    let n_len_base_name_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.len());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{c_sheet_name_base}{c_sheet_name_suffix}")
}

/// Split `0..n_total` into `[start, end)` ranges of at most `n_size_max`.
///
/// An empty total yields a single `(0, 0)` range.
fn derive_bounded_ranges(n_total: usize, n_size_max: usize) -> Vec<(usize, usize)> {
    let mut l_ranges = Vec::new();
    let mut n_cursor = 0;
    while n_cursor < n_total {
        let n_end = usize::min(n_total, n_cursor + n_size_max);
        l_ranges.push((n_cursor, n_end));
        n_cursor = n_end;
    }
    if l_ranges.is_empty() {
        l_ranges.push((0, 0));
    }
    l_ranges
}

/// Keep only `indices` inside `[col_start_inclusive, col_end_exclusive)`,
/// shifted to slice-local positions.
pub fn derive_slice_indices(
    indices: &[usize],
    col_start_inclusive: usize,
    col_end_exclusive: usize,
) -> Vec<usize> {
    indices
        .iter()
        .filter(|idx| (col_start_inclusive..col_end_exclusive).contains(*idx))
        .map(|idx| idx - col_start_inclusive)
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellWidth

/// Estimate displayed width units for one cell text.
///
/// Non-ASCII characters count as 1.6 units.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasting

/// Cast a zero-based row index to the encoder's row type.
pub fn cast_row_num(value: usize) -> Result<u32, XlsxIoError> {
    u32::try_from(value)
        .map_err(|_| XlsxIoError::IndexOverflow(format!("row index overflow: {value}")))
}

/// Cast a zero-based column index to the encoder's column type.
pub fn cast_col_num(value: usize) -> Result<u16, XlsxIoError> {
    u16::try_from(value)
        .map_err(|_| XlsxIoError::IndexOverflow(format!("column index overflow: {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
