//! Stateless per-cell helpers and output-shape planning.

use pdukit_sms::{SpecSmsSegmentPolicy, calculate_sms_parts_with_policy, encode_uri_component};

use crate::spec::{EnumCellValue, SpecTransformOptions};

////////////////////////////////////////////////////////////////////////////////
// #region CellHelpers

/// Segment count for one cell. Only text cells are measured; every other
/// cell counts as one segment.
pub fn calculate_cell_sms_parts(value: &EnumCellValue, policy: &SpecSmsSegmentPolicy) -> usize {
    match value {
        EnumCellValue::String(txt) => calculate_sms_parts_with_policy(txt, policy),
        EnumCellValue::None | EnumCellValue::Number(_) => 1,
    }
}

/// Percent-encoded display text of one cell; empty for falsy cells.
pub fn encode_cell_value(value: &EnumCellValue) -> String {
    if value.is_falsy() {
        return String::new();
    }
    match value {
        EnumCellValue::String(txt) => encode_uri_component(txt),
        _ => encode_uri_component(&value.to_display_text()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ShapePlanning

/// Output width for a header of `width_header` columns.
pub fn derive_output_width(width_header: usize, options: &SpecTransformOptions) -> usize {
    let n_cols_passthrough = usize::min(width_header, options.n_cols_passthrough);
    n_cols_passthrough + 3 * (width_header - n_cols_passthrough)
}

/// Output indices of the segment-count columns.
pub fn derive_pdu_column_indices(width_header: usize, options: &SpecTransformOptions) -> Vec<usize> {
    let n_cols_expanded = width_header.saturating_sub(options.n_cols_passthrough);
    (0..n_cols_expanded)
        .map(|n_idx| options.n_cols_passthrough + 3 * n_idx + 2)
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_sms_parts_defaults_for_non_text() {
        let policy = SpecSmsSegmentPolicy::default();
        assert_eq!(calculate_cell_sms_parts(&EnumCellValue::None, &policy), 1);
        assert_eq!(
            calculate_cell_sms_parts(&EnumCellValue::Number(1e300), &policy),
            1
        );
        assert_eq!(
            calculate_cell_sms_parts(&EnumCellValue::from("x".repeat(200)), &policy),
            2
        );
        assert_eq!(calculate_cell_sms_parts(&EnumCellValue::empty(), &policy), 1);
    }

    #[test]
    fn test_encode_cell_value() {
        assert_eq!(encode_cell_value(&EnumCellValue::None), "");
        assert_eq!(encode_cell_value(&EnumCellValue::empty()), "");
        assert_eq!(encode_cell_value(&EnumCellValue::Number(f64::NAN)), "");
        assert_eq!(encode_cell_value(&EnumCellValue::Number(0.0)), "");
        assert_eq!(encode_cell_value(&EnumCellValue::Number(42.0)), "42");
        assert_eq!(encode_cell_value(&EnumCellValue::Number(-1.5)), "-1.5");
        assert_eq!(encode_cell_value(&EnumCellValue::from("it's")), "it%27s");
    }

    #[test]
    fn test_output_shape_planning() {
        let options = SpecTransformOptions::default();
        assert_eq!(derive_output_width(3, &options), 3);
        assert_eq!(derive_output_width(4, &options), 6);
        assert_eq!(derive_output_width(6, &options), 12);
        assert_eq!(derive_pdu_column_indices(3, &options), Vec::<usize>::new());
        assert_eq!(derive_pdu_column_indices(5, &options), vec![5, 8]);
    }
}
