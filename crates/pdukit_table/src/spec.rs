//! Grid models, transform options and errors.

use std::fmt;

use pdukit_sms::SpecSmsSegmentPolicy;
use thiserror::Error;

use crate::report::ReportTransform;

/// Leading columns copied verbatim.
pub const N_COLS_PASSTHROUGH_DEFAULT: usize = 3;
/// Header suffix for the encoded column.
pub const C_SUFFIX_ENCODED_DEFAULT: &str = " (Encoded)";
/// Header suffix for the segment-count column.
pub const C_SUFFIX_PDU_DEFAULT: &str = " (PDU)";

////////////////////////////////////////////////////////////////////////////////
// #region CellValue

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

/// Row-major cell grid. Row 0 is the header.
pub type Grid = Vec<Vec<EnumCellValue>>;

impl EnumCellValue {
    /// Empty text cell.
    pub fn empty() -> Self {
        Self::String(String::new())
    }

    /// `true` for blank cells, empty text and non-finite numbers.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::None => true,
            Self::String(val) => val.is_empty(),
            Self::Number(val) => !val.is_finite(),
        }
    }

    /// `true` for blank cells and zero, the values an expanded column
    /// treats as missing.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Number(val) => *val == 0.0 || !val.is_finite(),
            _ => self.is_blank(),
        }
    }

    /// Borrow the text of a `String` cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::String(val) => Some(val),
            _ => None,
        }
    }

    /// Text shown for this cell in labels and previews.
    ///
    /// Integral numbers print without a fractional part.
    pub fn to_display_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::String(val) => val.clone(),
            Self::Number(val) => format_number(*val),
        }
    }
}

impl fmt::Display for EnumCellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_text())
    }
}

impl From<&str> for EnumCellValue {
    fn from(val: &str) -> Self {
        Self::String(val.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(val: String) -> Self {
        Self::String(val)
    }
}

impl From<f64> for EnumCellValue {
    fn from(val: f64) -> Self {
        Self::Number(val)
    }
}

fn format_number(val: f64) -> String {
    if val.is_finite() && val.fract() == 0.0 && val.abs() < 1e15 {
        return (val as i64).to_string();
    }
    val.to_string()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Options for [`crate::transform::transform_grid_with_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTransformOptions {
    /// Leading columns copied verbatim; also the minimum header width.
    pub n_cols_passthrough: usize,
    /// Suffix appended to the label of each encoded column.
    pub suffix_encoded: String,
    /// Suffix appended to the label of each segment-count column.
    pub suffix_pdu: String,
    /// Segment counting policy.
    pub policy_segment: SpecSmsSegmentPolicy,
    /// Worker threads for row processing; serial when `None` or `<= 1`.
    pub num_workers_max: Option<usize>,
}

impl Default for SpecTransformOptions {
    fn default() -> Self {
        Self {
            n_cols_passthrough: N_COLS_PASSTHROUGH_DEFAULT,
            suffix_encoded: C_SUFFIX_ENCODED_DEFAULT.to_string(),
            suffix_pdu: C_SUFFIX_PDU_DEFAULT.to_string(),
            policy_segment: SpecSmsSegmentPolicy::default(),
            num_workers_max: None,
        }
    }
}

/// Transformed grid plus run report.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecTransformOutput {
    /// Expanded grid.
    pub grid: Grid,
    /// Counters and warnings.
    pub report: ReportTransform,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Transform failures. Irregular cell data is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Fewer than two rows, or a header narrower than the passthrough block.
    #[error(
        "Invalid sheet structure: got {n_rows} row(s) and {n_cols_header} header column(s); \
         need at least 2 rows and {n_cols_required} columns."
    )]
    InvalidShape {
        /// Total row count including header.
        n_rows: usize,
        /// Header width.
        n_cols_header: usize,
        /// Minimum header width.
        n_cols_required: usize,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_blank_and_display() {
        assert!(EnumCellValue::None.is_blank());
        assert!(EnumCellValue::empty().is_blank());
        assert!(EnumCellValue::Number(f64::NAN).is_blank());
        assert!(!EnumCellValue::Number(0.0).is_blank());
        assert!(!EnumCellValue::from(" ").is_blank());

        assert!(EnumCellValue::Number(0.0).is_falsy());
        assert!(EnumCellValue::Number(-0.0).is_falsy());
        assert!(EnumCellValue::None.is_falsy());
        assert!(!EnumCellValue::Number(0.5).is_falsy());
        assert!(!EnumCellValue::from("0").is_falsy());

        assert_eq!(EnumCellValue::Number(555.0).to_display_text(), "555");
        assert_eq!(EnumCellValue::Number(-3.0).to_display_text(), "-3");
        assert_eq!(EnumCellValue::Number(1.5).to_display_text(), "1.5");
        assert_eq!(EnumCellValue::None.to_string(), "");
        assert_eq!(EnumCellValue::from("Ann").to_string(), "Ann");
    }

    #[test]
    fn test_invalid_shape_message() {
        let err = TransformError::InvalidShape {
            n_rows: 1,
            n_cols_header: 4,
            n_cols_required: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid sheet structure: got 1 row(s) and 4 header column(s); \
             need at least 2 rows and 3 columns."
        );
    }
}
