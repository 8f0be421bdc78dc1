//! Read → transform → write orchestration.

use std::path::{Path, PathBuf};

use pdukit_io_html::write_grid_html;
use pdukit_io_xlsx::{
    SpecXlsxReport, SpecXlsxSheetWriteOptions, SpecXlsxWriteOptions, XlsxWriter,
    derive_default_xlsx_formats, read_grid_from_path,
};
use pdukit_table::{EnumCellValue, derive_pdu_column_indices, transform_grid_with_options};
use tracing::{info, warn};

use crate::spec::{ProcessError, ReportProcess, SpecProcessOptions, SpecProcessOutput};

/// Suffix inserted before the extension of derived output names.
const C_SUFFIX_OUTPUT_STEM: &str = "_encoded";

/// Derive `<dir>/<stem>_encoded.<extension>` from an input path.
pub fn derive_default_output_path(path_in: &Path, extension: &str) -> PathBuf {
    let c_stem = path_in
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    path_in.with_file_name(format!("{c_stem}{C_SUFFIX_OUTPUT_STEM}.{extension}"))
}

/// Transform an in-memory grid and write the configured sinks.
///
/// # Errors
/// [`ProcessError::Transform`] for a malformed grid; writer and
/// filesystem failures otherwise.
pub fn process_grid(
    grid: &[Vec<EnumCellValue>],
    options: &SpecProcessOptions,
) -> Result<SpecProcessOutput, ProcessError> {
    let output_transform = transform_grid_with_options(grid, &options.transform)?;
    for c_warning in &output_transform.report.warnings {
        warn!("{c_warning}");
    }

    let grid_out = output_transform.grid;
    let mut report = ReportProcess {
        cnt_rows_out: grid_out.len() as u64,
        cnt_cols_out: grid_out.first().map_or(0, Vec::len) as u64,
        report_transform: output_transform.report,
        ..ReportProcess::default()
    };

    if let Some(path_out) = &options.file_out {
        let width_header = grid.first().map_or(0, Vec::len);
        report.reports_xlsx = write_grid_xlsx(&grid_out, path_out, width_header, options)?;
        report.file_out = Some(path_out.to_string_lossy().to_string());
        info!(path = %path_out.display(), "workbook written");
    }

    if let Some(path_html) = &options.file_html {
        write_grid_html(path_html, &grid_out, &options.html).map_err(|source| {
            ProcessError::Io {
                path: path_html.clone(),
                source,
            }
        })?;
        report.file_html = Some(path_html.to_string_lossy().to_string());
        info!(path = %path_html.display(), "html preview written");
    }

    Ok(SpecProcessOutput {
        grid: grid_out,
        report,
    })
}

/// Read a workbook, transform its selected sheet and write the sinks.
///
/// # Errors
/// Reader failures, then everything [`process_grid`] reports.
pub fn process_xlsx_file(
    path_in: impl AsRef<Path>,
    options: &SpecProcessOptions,
) -> Result<SpecProcessOutput, ProcessError> {
    let path_in = path_in.as_ref();
    let grid = read_grid_from_path(path_in, &options.read)?;
    info!(
        path = %path_in.display(),
        n_rows = grid.len(),
        "workbook read"
    );

    let mut output = process_grid(&grid, options)?;
    output.report.file_in = Some(path_in.to_string_lossy().to_string());
    Ok(output)
}

fn write_grid_xlsx(
    grid_out: &[Vec<EnumCellValue>],
    path_out: &Path,
    width_header: usize,
    options: &SpecProcessOptions,
) -> Result<Vec<SpecXlsxReport>, ProcessError> {
    let mut writer = XlsxWriter::new(
        path_out.to_path_buf(),
        derive_default_xlsx_formats(),
        SpecXlsxWriteOptions::default(),
    );
    let options_sheet = SpecXlsxSheetWriteOptions {
        cols_integer: derive_pdu_column_indices(width_header, &options.transform),
        col_freeze: if options.if_freeze_passthrough {
            options.transform.n_cols_passthrough
        } else {
            0
        },
        ..SpecXlsxSheetWriteOptions::default()
    };
    writer.write_sheet(grid_out, &options.sheet_name_out, &options_sheet)?;
    writer.close()?;
    Ok(writer.report())
}
