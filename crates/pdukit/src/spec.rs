//! Pipeline options, output and report models.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;

use pdukit_io_html::SpecHtmlRenderOptions;
use pdukit_io_xlsx::{C_SHEET_NAME_DEFAULT, SpecXlsxReadOptions, SpecXlsxReport, XlsxIoError};
use pdukit_table::{Grid, ReportTransform, SpecTransformOptions, TransformError};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Options for [`crate::pipeline::process_grid`] and
/// [`crate::pipeline::process_xlsx_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecProcessOptions {
    /// Input sheet selection.
    pub read: SpecXlsxReadOptions,
    /// Column expansion options.
    pub transform: SpecTransformOptions,
    /// Workbook output path; no workbook is written when `None`.
    pub file_out: Option<PathBuf>,
    /// HTML preview path; no preview is written when `None`.
    pub file_html: Option<PathBuf>,
    /// Output sheet name.
    pub sheet_name_out: String,
    /// Freeze the passthrough columns in the output sheet.
    pub if_freeze_passthrough: bool,
    /// HTML preview rendering.
    pub html: SpecHtmlRenderOptions,
}

impl Default for SpecProcessOptions {
    fn default() -> Self {
        Self {
            read: SpecXlsxReadOptions::default(),
            transform: SpecTransformOptions::default(),
            file_out: None,
            file_html: None,
            sheet_name_out: C_SHEET_NAME_DEFAULT.to_string(),
            if_freeze_passthrough: true,
            html: SpecHtmlRenderOptions::default(),
        }
    }
}

/// Processed grid plus run report.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecProcessOutput {
    /// Expanded grid, header included.
    pub grid: Grid,
    /// Counters, warnings and written paths.
    pub report: ReportProcess,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Report

/// Aggregate report for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportProcess {
    /// Source workbook, when the run started from a file.
    pub file_in: Option<String>,
    /// Written workbook, if any.
    pub file_out: Option<String>,
    /// Written HTML preview, if any.
    pub file_html: Option<String>,
    /// Rows in the output grid, header included.
    pub cnt_rows_out: u64,
    /// Columns in the output header.
    pub cnt_cols_out: u64,
    /// Transform counters and warnings.
    pub report_transform: ReportTransform,
    /// One report per workbook write call.
    pub reports_xlsx: Vec<SpecXlsxReport>,
}

impl ReportProcess {
    /// Transform warnings followed by writer warnings.
    pub fn warnings(&self) -> Vec<String> {
        self.report_transform
            .warnings
            .iter()
            .chain(self.reports_xlsx.iter().flat_map(|report| report.warnings.iter()))
            .cloned()
            .collect()
    }

    /// Number of transform and writer warnings.
    pub fn warning_count(&self) -> usize {
        self.report_transform.warning_count()
            + self
                .reports_xlsx
                .iter()
                .map(|report| report.warnings.len())
                .sum::<usize>()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = self.report_transform.to_dict();
        dict_counts.insert("cnt_rows_out".to_string(), self.cnt_rows_out);
        dict_counts.insert("cnt_cols_out".to_string(), self.cnt_cols_out);
        dict_counts.insert(
            "cnt_sheets_out".to_string(),
            self.reports_xlsx
                .iter()
                .map(|report| report.sheets.len() as u64)
                .sum(),
        );
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable summary; one line plus one line per written file.
    pub fn format(&self, prefix: &str) -> String {
        let mut c_out = format!(
            "{prefix} rows_out={} cols_out={} {}",
            self.cnt_rows_out,
            self.cnt_cols_out,
            self.report_transform.format("|")
        );
        for (c_label, c_path) in [
            ("in", &self.file_in),
            ("xlsx", &self.file_out),
            ("html", &self.file_html),
        ] {
            if let Some(c_path) = c_path {
                c_out.push_str(&format!("\n{prefix} {c_label}={c_path}"));
            }
        }
        c_out
    }
}

impl fmt::Display for ReportProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[PROCESS]"))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Pipeline failures.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Input grid has the wrong shape.
    #[error(transparent)]
    Transform(#[from] TransformError),
    /// Workbook read or write failed.
    #[error(transparent)]
    Xlsx(#[from] XlsxIoError),
    /// HTML preview could not be written.
    #[error("Failed to write `{}`: {source}", .path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    /// True for the user-facing "bad sheet layout" condition.
    pub fn is_invalid_shape(&self) -> bool {
        matches!(
            self,
            Self::Transform(TransformError::InvalidShape { .. })
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
