//! XLSX writer kernel that encodes grids into workbook output.

use std::collections::BTreeSet;
use std::path::PathBuf;

use pdukit_table::EnumCellValue;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{debug, warn};

use crate::conf::N_LEN_EXCEL_SHEET_NAME_MAX;
use crate::error::XlsxIoError;
use crate::spec::{
    EnumAutofitColumnsRule, SpecAutofitCellsPolicy, SpecCellFormat, SpecSheetSlice,
    SpecXlsxFormatSet, SpecXlsxReport, SpecXlsxWriteOptions,
};
use crate::util::{
    cast_col_num, cast_row_num, derive_slice_indices, estimate_unicode_string_width,
    plan_sheet_slices, sanitize_sheet_name,
};

/// Per-sheet call options.
#[derive(Debug, Clone, Default)]
pub struct SpecXlsxSheetWriteOptions {
    /// Grid column indices written with the integer format.
    pub cols_integer: Vec<usize>,
    /// Number of frozen columns.
    pub col_freeze: usize,
    /// Frozen row index; defaults to the header height (1) when `None`.
    pub row_freeze: Option<usize>,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
}

/// Stateful workbook writer.
///
/// Sheets are buffered in memory until [`Self::close`] writes them to disk
/// or [`Self::save_to_buffer`] returns the encoded bytes.
pub struct XlsxWriter {
    path_file_out: Option<PathBuf>,
    workbook: Workbook,
    formats: SpecXlsxFormatSet,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to an output path.
    pub fn new(
        path_file_out: PathBuf,
        formats: SpecXlsxFormatSet,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self::build(Some(path_file_out), formats, write_options)
    }

    /// Create writer whose output is only available through
    /// [`Self::save_to_buffer`].
    pub fn new_in_memory(formats: SpecXlsxFormatSet, write_options: SpecXlsxWriteOptions) -> Self {
        Self::build(None, formats, write_options)
    }

    fn build(
        path_file_out: Option<PathBuf>,
        formats: SpecXlsxFormatSet,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            formats,
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return output file path as string, if bound to one.
    pub fn file_out(&self) -> Option<String> {
        self.path_file_out
            .as_ref()
            .map(|path| path.to_string_lossy().to_string())
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Flush workbook to disk. Idempotent.
    ///
    /// # Errors
    /// [`XlsxIoError::InvalidOptions`] for in-memory writers, or
    /// [`XlsxIoError::Write`] when saving fails.
    pub fn close(&mut self) -> Result<(), XlsxIoError> {
        if self.if_closed {
            return Ok(());
        }
        let Some(path_file_out) = &self.path_file_out else {
            return Err(XlsxIoError::InvalidOptions(
                "Writer has no output path; use save_to_buffer().".to_string(),
            ));
        };
        self.workbook.save(path_file_out)?;
        debug!(path = %path_file_out.display(), "workbook saved");
        self.if_closed = true;
        Ok(())
    }

    /// Encode the workbook and return its bytes. Closes the writer.
    ///
    /// # Errors
    /// [`XlsxIoError::Closed`] after a previous close, or
    /// [`XlsxIoError::Write`] when encoding fails.
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>, XlsxIoError> {
        if self.if_closed {
            return Err(XlsxIoError::Closed);
        }
        let v_bytes = self.workbook.save_to_buffer()?;
        debug!(n_bytes = v_bytes.len(), "workbook encoded to buffer");
        self.if_closed = true;
        Ok(v_bytes)
    }

    /// Write one sheet from a grid whose row 0 is the header.
    ///
    /// # Errors
    /// [`XlsxIoError::Closed`], [`XlsxIoError::InvalidOptions`] for an empty
    /// grid or invalid autofit policy, or encoder failures.
    pub fn write_sheet(
        &mut self,
        grid: &[Vec<EnumCellValue>],
        sheet_name: &str,
        options: &SpecXlsxSheetWriteOptions,
    ) -> Result<(), XlsxIoError> {
        if self.if_closed {
            return Err(XlsxIoError::Closed);
        }
        validate_policy_autofit(&options.policy_autofit)?;

        let Some((row_header, rows_data)) = grid.split_first() else {
            return Err(XlsxIoError::InvalidOptions(
                "Grid must have a header row.".to_string(),
            ));
        };
        let n_width_grid = grid.iter().map(Vec::len).max().unwrap_or(0);
        let n_rows_header = 1;

        let mut report = SpecXlsxReport::default();
        let l_sheet_parts = plan_sheet_slices(
            rows_data.len(),
            n_width_grid,
            n_rows_header,
            &sanitize_sheet_name(sheet_name, "_"),
            &mut report,
        )?;
        for c_warning in &report.warnings {
            warn!("{c_warning}");
        }

        let n_row_freeze = options.row_freeze.unwrap_or(n_rows_header);
        let fmt_header = derive_rust_xlsx_format(
            &self.formats.header.merge(&self.write_options.base_format_patch),
        );

        for sheet_slice in l_sheet_parts {
            let sheet_name_unique = self.derive_unique_sheet_name(&sheet_slice.sheet_name);
            let n_width_slice = sheet_slice.col_end_exclusive - sheet_slice.col_start_inclusive;

            let set_cols_idx_integer: BTreeSet<usize> = derive_slice_indices(
                &options.cols_integer,
                sheet_slice.col_start_inclusive,
                sheet_slice.col_end_exclusive,
            )
            .into_iter()
            .collect();
            let l_fmt_data_by_col: Vec<Format> = (0..n_width_slice)
                .map(|n_idx_col| {
                    let fmt_base = if set_cols_idx_integer.contains(&n_idx_col) {
                        &self.formats.integer
                    } else {
                        &self.formats.text
                    };
                    derive_rust_xlsx_format(&fmt_base.merge(&self.write_options.base_format_patch))
                })
                .collect();

            let worksheet = self.workbook.add_worksheet();
            worksheet.set_name(&sheet_name_unique)?;

            let mut l_width_by_col_header = vec![0usize; n_width_slice];
            let mut l_width_by_col_body = vec![0usize; n_width_slice];

            for n_idx_col in 0..n_width_slice {
                let value = row_header
                    .get(sheet_slice.col_start_inclusive + n_idx_col)
                    .unwrap_or(&EnumCellValue::None);
                l_width_by_col_header[n_idx_col] = estimate_width_len(value);
                write_cell_with_format(worksheet, 0, n_idx_col, value, &fmt_header)?;
            }

            worksheet.set_freeze_panes(
                cast_row_num(n_row_freeze)?,
                cast_col_num(options.col_freeze)?,
            )?;

            let if_blank_empty_strings = self.write_options.if_blank_empty_strings;
            let n_rows_autofit_max = options
                .policy_autofit
                .height_body_inferred_max
                .unwrap_or(usize::MAX);
            let rows_slice = &rows_data[sheet_slice.row_start_inclusive..sheet_slice.row_end_exclusive];
            for (n_row_local, row) in rows_slice.iter().enumerate() {
                let if_autofit_row = n_row_local < n_rows_autofit_max;
                for n_idx_col in 0..n_width_slice {
                    let value = row
                        .get(sheet_slice.col_start_inclusive + n_idx_col)
                        .unwrap_or(&EnumCellValue::None);
                    let value = if if_blank_empty_strings && value.is_blank() {
                        &EnumCellValue::None
                    } else {
                        value
                    };

                    if if_autofit_row {
                        l_width_by_col_body[n_idx_col] =
                            usize::max(l_width_by_col_body[n_idx_col], estimate_width_len(value));
                    }

                    write_cell_with_format(
                        worksheet,
                        n_rows_header + n_row_local,
                        n_idx_col,
                        value,
                        &l_fmt_data_by_col[n_idx_col],
                    )?;
                }
            }

            apply_autofit_widths(
                worksheet,
                &options.policy_autofit,
                &l_width_by_col_header,
                &l_width_by_col_body,
            )?;

            debug!(
                sheet = %sheet_name_unique,
                n_rows = rows_slice.len(),
                n_cols = n_width_slice,
                "sheet written"
            );
            report.sheets.push(SpecSheetSlice {
                sheet_name: sheet_name_unique,
                row_start_inclusive: sheet_slice.row_start_inclusive,
                row_end_exclusive: sheet_slice.row_end_exclusive,
                col_start_inclusive: sheet_slice.col_start_inclusive,
                col_end_exclusive: sheet_slice.col_end_exclusive,
            });
        }

        self.l_reports.push(report);
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let mut n_idx = 2usize;
        loop {
            let c_suffix = format!("__{n_idx}");
            let n_len_base_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.len());
            let base_name: String = name.chars().take(usize::max(1, n_len_base_max)).collect();
            let candidate = format!("{base_name}{c_suffix}");
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

/// Estimate displayed width units for one cell.
pub fn estimate_width_len(value: &EnumCellValue) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(s) => estimate_unicode_string_width(s),
        EnumCellValue::Number(_) => value.to_display_text().len(),
    }
}

fn apply_autofit_widths(
    worksheet: &mut Worksheet,
    policy_autofit: &SpecAutofitCellsPolicy,
    l_width_by_col_header: &[usize],
    l_width_by_col_body: &[usize],
) -> Result<(), XlsxIoError> {
    if matches!(policy_autofit.rule_columns, EnumAutofitColumnsRule::None) {
        return Ok(());
    }

    let n_min = usize::max(1, policy_autofit.width_cell_min);
    let n_max = usize::min(255, usize::max(n_min, policy_autofit.width_cell_max));
    let n_pad = policy_autofit.width_cell_padding;

    for (n_idx_col, (n_width_header, n_width_body)) in l_width_by_col_header
        .iter()
        .zip(l_width_by_col_body)
        .enumerate()
    {
        let n_width_recorded = match policy_autofit.rule_columns {
            EnumAutofitColumnsRule::Header | EnumAutofitColumnsRule::None => *n_width_header,
            EnumAutofitColumnsRule::Body => *n_width_body,
            EnumAutofitColumnsRule::All => usize::max(*n_width_header, *n_width_body),
        };
        let n_width_final = usize::min(n_max, usize::max(n_min, n_width_recorded + n_pad));
        worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width_final as f64)?;
    }
    Ok(())
}

fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), XlsxIoError> {
    if policy_autofit.width_cell_min == 0 {
        return Err(XlsxIoError::InvalidOptions(
            "policy_autofit.width_cell_min must be >= 1.".to_string(),
        ));
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(XlsxIoError::InvalidOptions(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        ));
    }
    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), XlsxIoError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumCellValue::Number(val) if val.is_finite() => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
        EnumCellValue::Number(_) => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "justify" => Some(FormatAlign::Justify),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}
