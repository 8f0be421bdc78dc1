//! Column-expansion kernel.
//!
//! The first `n_cols_passthrough` columns are copied verbatim. Every later
//! header column becomes a `(label, label + " (Encoded)", label + " (PDU)")`
//! triple and every later data cell a `(cell, encoded, segments)` triple.
//! Short rows are padded with empty text; cells past the header width are
//! dropped and reported.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::report::{ReportTransformBuilder, SpecRowStats};
use crate::spec::{EnumCellValue, Grid, SpecTransformOptions, SpecTransformOutput, TransformError};
use crate::util::{calculate_cell_sms_parts, derive_output_width, encode_cell_value};

/// Check the grid has a header and data rows, and a wide enough header.
///
/// # Errors
/// [`TransformError::InvalidShape`] when there are fewer than 2 rows or the
/// header has fewer than `n_cols_required` columns.
pub fn validate_grid_shape(
    grid: &[Vec<EnumCellValue>],
    n_cols_required: usize,
) -> Result<(), TransformError> {
    split_grid_checked(grid, n_cols_required).map(|_| ())
}

fn split_grid_checked(
    grid: &[Vec<EnumCellValue>],
    n_cols_required: usize,
) -> Result<(&[EnumCellValue], &[Vec<EnumCellValue>]), TransformError> {
    match grid.split_first() {
        Some((row_header, rows_data))
            if !rows_data.is_empty() && row_header.len() >= n_cols_required =>
        {
            Ok((row_header.as_slice(), rows_data))
        }
        _ => Err(TransformError::InvalidShape {
            n_rows: grid.len(),
            n_cols_header: grid.first().map_or(0, Vec::len),
            n_cols_required,
        }),
    }
}

/// Expand `grid` with default options and return the new grid.
///
/// # Errors
/// See [`validate_grid_shape`].
pub fn transform_grid(grid: &[Vec<EnumCellValue>]) -> Result<Grid, TransformError> {
    transform_grid_with_options(grid, &SpecTransformOptions::default()).map(|out| out.grid)
}

/// Expand `grid` and collect a [`crate::report::ReportTransform`].
///
/// # Errors
/// See [`validate_grid_shape`].
pub fn transform_grid_with_options(
    grid: &[Vec<EnumCellValue>],
    options: &SpecTransformOptions,
) -> Result<SpecTransformOutput, TransformError> {
    let (row_header, rows_data) = split_grid_checked(grid, options.n_cols_passthrough)?;

    let width_header = row_header.len();
    let mut builder_report =
        ReportTransformBuilder::new((width_header - options.n_cols_passthrough) as u64);

    let mut grid_out = Vec::with_capacity(grid.len());
    grid_out.push(transform_header_row(row_header, options));

    let l_rows_out = transform_data_rows(rows_data, width_header, options, &mut builder_report);
    for (n_idx_row, (row_out, stats)) in l_rows_out.into_iter().enumerate() {
        builder_report.add_row(n_idx_row + 1, &stats);
        grid_out.push(row_out);
    }

    Ok(SpecTransformOutput {
        grid: grid_out,
        report: builder_report.build(),
    })
}

fn transform_header_row(
    row_header: &[EnumCellValue],
    options: &SpecTransformOptions,
) -> Vec<EnumCellValue> {
    let n_cols_passthrough = options.n_cols_passthrough;
    let mut row_out = Vec::with_capacity(derive_output_width(row_header.len(), options));
    row_out.extend(row_header[..n_cols_passthrough].iter().cloned());

    for cell in &row_header[n_cols_passthrough..] {
        let c_label = cell.to_display_text();
        row_out.push(cell.clone());
        row_out.push(EnumCellValue::String(format!(
            "{c_label}{}",
            options.suffix_encoded
        )));
        row_out.push(EnumCellValue::String(format!("{c_label}{}", options.suffix_pdu)));
    }
    row_out
}

fn transform_data_rows(
    rows_data: &[Vec<EnumCellValue>],
    width_header: usize,
    options: &SpecTransformOptions,
    builder_report: &mut ReportTransformBuilder,
) -> Vec<(Vec<EnumCellValue>, SpecRowStats)> {
    let run_serial = || {
        rows_data
            .iter()
            .map(|row| transform_data_row(row, width_header, options))
            .collect::<Vec<_>>()
    };

    let n_workers_max = options.num_workers_max.unwrap_or(1);
    if n_workers_max <= 1 {
        return run_serial();
    }

    let Ok(thread_pool) = ThreadPoolBuilder::new().num_threads(n_workers_max).build() else {
        builder_report.add_warning(format!(
            "Failed to initialize thread pool (workers={n_workers_max}); fallback to serial transform."
        ));
        return run_serial();
    };

    thread_pool.install(|| {
        rows_data
            .par_iter()
            .map(|row| transform_data_row(row, width_header, options))
            .collect::<Vec<_>>()
    })
}

fn transform_data_row(
    row: &[EnumCellValue],
    width_header: usize,
    options: &SpecTransformOptions,
) -> (Vec<EnumCellValue>, SpecRowStats) {
    let n_cols_passthrough = options.n_cols_passthrough;
    let mut stats = SpecRowStats {
        if_padded: row.len() < width_header,
        if_truncated: row.iter().skip(width_header).any(|cell| !cell.is_blank()),
        ..SpecRowStats::default()
    };

    let mut row_out = Vec::with_capacity(derive_output_width(width_header, options));
    for n_idx_col in 0..n_cols_passthrough {
        row_out.push(
            row.get(n_idx_col)
                .cloned()
                .unwrap_or_else(EnumCellValue::empty),
        );
    }

    for n_idx_col in n_cols_passthrough..width_header {
        let Some(cell) = row.get(n_idx_col).filter(|cell| !cell.is_falsy()) else {
            row_out.push(EnumCellValue::empty());
            row_out.push(EnumCellValue::empty());
            row_out.push(EnumCellValue::Number(1.0));
            stats.cnt_cells_empty += 1;
            stats.cnt_segments += 1;
            continue;
        };

        let n_segments = calculate_cell_sms_parts(cell, &options.policy_segment);
        row_out.push(cell.clone());
        row_out.push(EnumCellValue::String(encode_cell_value(cell)));
        row_out.push(EnumCellValue::Number(n_segments as f64));
        stats.cnt_cells_encoded += 1;
        stats.cnt_segments += n_segments as u64;
    }

    (row_out, stats)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use pdukit_sms::{EnumExtendedCharCost, SpecSmsSegmentPolicy};

    fn derive_row(values: &[&str]) -> Vec<EnumCellValue> {
        values.iter().map(|val| EnumCellValue::from(*val)).collect()
    }

    fn txt(val: &str) -> EnumCellValue {
        EnumCellValue::from(val)
    }

    fn num(val: f64) -> EnumCellValue {
        EnumCellValue::Number(val)
    }

    #[test]
    fn test_transform_single_message_column() {
        let grid = vec![
            derive_row(&["Name", "Phone", "Email", "Msg"]),
            derive_row(&["Ann", "555", "a@b.com", "Hello"]),
        ];

        let grid_out = transform_grid(&grid).expect("transform");

        assert_eq!(
            grid_out,
            vec![
                derive_row(&["Name", "Phone", "Email", "Msg", "Msg (Encoded)", "Msg (PDU)"]),
                vec![
                    txt("Ann"),
                    txt("555"),
                    txt("a@b.com"),
                    txt("Hello"),
                    txt("Hello"),
                    num(1.0)
                ],
            ]
        );
    }

    #[test]
    fn test_transform_encodes_and_counts_each_column() {
        let c_long = "x".repeat(200);
        let grid = vec![
            derive_row(&["Name", "Phone", "Email", "Greeting", "Promo"]),
            derive_row(&["Bo", "1", "b@c.d", "Dear John's Café — 50% off!", &c_long]),
        ];

        let out = transform_grid_with_options(&grid, &SpecTransformOptions::default())
            .expect("transform");

        assert_eq!(
            out.grid[0],
            derive_row(&[
                "Name",
                "Phone",
                "Email",
                "Greeting",
                "Greeting (Encoded)",
                "Greeting (PDU)",
                "Promo",
                "Promo (Encoded)",
                "Promo (PDU)",
            ])
        );
        assert_eq!(
            out.grid[1][4],
            txt("Dear%20John%27s%20Caf%C3%A9%20%E2%80%94%2050%25%20off!")
        );
        assert_eq!(out.grid[1][5], num(1.0));
        assert_eq!(out.grid[1][6], txt(&c_long));
        assert_eq!(out.grid[1][7], txt(&c_long));
        assert_eq!(out.grid[1][8], num(2.0));

        assert_eq!(out.report.cnt_rows, 1);
        assert_eq!(out.report.cnt_cols_expanded, 2);
        assert_eq!(out.report.cnt_cells_encoded, 2);
        assert_eq!(out.report.cnt_segments, 3);
    }

    #[test]
    fn test_transform_empty_cells_count_one_segment() {
        let grid = vec![
            derive_row(&["A", "B", "C", "D", "E"]),
            vec![txt("a"), txt("b"), txt("c"), EnumCellValue::None, txt("")],
        ];

        let out = transform_grid_with_options(&grid, &SpecTransformOptions::default())
            .expect("transform");

        assert_eq!(
            out.grid[1],
            vec![
                txt("a"),
                txt("b"),
                txt("c"),
                txt(""),
                txt(""),
                num(1.0),
                txt(""),
                txt(""),
                num(1.0),
            ]
        );
        assert_eq!(out.report.cnt_cells_empty, 2);
        assert_eq!(
            pdukit_sms::calculate_sms_parts(""),
            1,
            "classifier and transformer agree on empty text"
        );
    }

    #[test]
    fn test_transform_pads_short_rows() {
        let grid = vec![
            derive_row(&["Name", "Phone", "Email", "Msg", "Msg2"]),
            derive_row(&["Ann"]),
            derive_row(&["Bob", "1", "e", "hi"]),
        ];

        let out = transform_grid_with_options(&grid, &SpecTransformOptions::default())
            .expect("transform");

        assert_eq!(
            out.grid[1],
            vec![
                txt("Ann"),
                txt(""),
                txt(""),
                txt(""),
                txt(""),
                num(1.0),
                txt(""),
                txt(""),
                num(1.0),
            ]
        );
        assert_eq!(out.grid[2][3..6].to_vec(), vec![txt("hi"), txt("hi"), num(1.0)]);
        assert_eq!(out.grid[2][6..9].to_vec(), vec![txt(""), txt(""), num(1.0)]);
        assert_eq!(out.report.cnt_rows_padded, 2);
        assert_eq!(out.report.cnt_rows_truncated, 0);
    }

    #[test]
    fn test_transform_drops_cells_beyond_header() {
        let grid = vec![
            derive_row(&["Name", "Phone", "Email", "Msg"]),
            derive_row(&["Ann", "1", "e", "hi", "stray"]),
            vec![txt("Bob"), txt("2"), txt("f"), txt("yo"), EnumCellValue::None],
        ];

        let out = transform_grid_with_options(&grid, &SpecTransformOptions::default())
            .expect("transform");

        assert!(out.grid.iter().all(|row| row.len() == 6));
        assert_eq!(out.report.cnt_rows_truncated, 1);
        assert_eq!(
            out.report.warnings,
            vec!["Row 1: cells beyond the header width were dropped.".to_string()]
        );
    }

    #[test]
    fn test_transform_number_cells() {
        let grid = vec![
            vec![txt("Name"), txt("Phone"), txt("Email"), num(2024.0)],
            vec![txt("Ann"), num(555.0), txt("a@b.com"), num(12.5)],
        ];

        let grid_out = transform_grid(&grid).expect("transform");

        assert_eq!(
            grid_out[0],
            vec![
                txt("Name"),
                txt("Phone"),
                txt("Email"),
                num(2024.0),
                txt("2024 (Encoded)"),
                txt("2024 (PDU)"),
            ]
        );
        assert_eq!(
            grid_out[1],
            vec![
                txt("Ann"),
                num(555.0),
                txt("a@b.com"),
                num(12.5),
                txt("12.5"),
                num(1.0),
            ]
        );
    }

    #[test]
    fn test_transform_zero_cells_take_the_empty_triple() {
        let grid = vec![
            vec![txt("Name"), txt("Phone"), txt("Email"), txt("Msg"), txt("Note")],
            vec![txt("a"), num(0.0), txt("c"), num(0.0), txt("0")],
        ];

        let out = transform_grid_with_options(&grid, &SpecTransformOptions::default())
            .expect("transform");

        assert_eq!(
            out.grid[1],
            vec![
                txt("a"),
                num(0.0),
                txt("c"),
                txt(""),
                txt(""),
                num(1.0),
                txt("0"),
                txt("0"),
                num(1.0),
            ]
        );
        assert_eq!(out.report.cnt_cells_empty, 1);
        assert_eq!(out.report.cnt_cells_encoded, 1);
    }

    #[test]
    fn test_transform_header_only_columns() {
        let grid = vec![derive_row(&["A", "B", "C"]), derive_row(&["1", "2", "3"])];
        let grid_out = transform_grid(&grid).expect("transform");
        assert_eq!(grid_out, grid);
    }

    #[test]
    fn test_transform_invalid_shape() {
        let grid_header_only = vec![derive_row(&["Name", "Phone", "Email", "Msg"])];
        assert_eq!(
            transform_grid(&grid_header_only),
            Err(TransformError::InvalidShape {
                n_rows: 1,
                n_cols_header: 4,
                n_cols_required: 3,
            })
        );

        let grid_narrow = vec![derive_row(&["Name", "Phone"]), derive_row(&["Ann", "1"])];
        assert_eq!(
            transform_grid(&grid_narrow),
            Err(TransformError::InvalidShape {
                n_rows: 2,
                n_cols_header: 2,
                n_cols_required: 3,
            })
        );

        assert!(transform_grid(&[]).is_err());
    }

    #[test]
    fn test_transform_custom_options() {
        let grid = vec![
            derive_row(&["Id", "Msg"]),
            derive_row(&["7", &"]".repeat(100)]),
        ];
        let options = SpecTransformOptions {
            n_cols_passthrough: 1,
            suffix_encoded: "_enc".to_string(),
            suffix_pdu: "_parts".to_string(),
            policy_segment: SpecSmsSegmentPolicy {
                rule_extended_cost: EnumExtendedCharCost::Double,
            },
            num_workers_max: None,
        };

        let out = transform_grid_with_options(&grid, &options).expect("transform");

        assert_eq!(out.grid[0], derive_row(&["Id", "Msg", "Msg_enc", "Msg_parts"]));
        assert_eq!(out.grid[1][3], num(2.0));
    }

    #[test]
    fn test_transform_parallel_matches_serial() {
        let mut grid = vec![derive_row(&["Name", "Phone", "Email", "Msg", "Alt"])];
        for n_idx in 0..500 {
            let c_msg = "é".repeat(n_idx % 180);
            let c_alt = format!("ж{}", "a".repeat(n_idx % 90));
            grid.push(vec![
                txt(&format!("user{n_idx}")),
                num(n_idx as f64),
                txt("x@y.z"),
                txt(&c_msg),
                txt(&c_alt),
            ]);
        }

        let out_serial = transform_grid_with_options(&grid, &SpecTransformOptions::default())
            .expect("serial");
        let out_parallel = transform_grid_with_options(
            &grid,
            &SpecTransformOptions {
                num_workers_max: Some(4),
                ..SpecTransformOptions::default()
            },
        )
        .expect("parallel");

        assert_eq!(out_serial, out_parallel);
    }

    proptest! {
        #[test]
        fn prop_output_shape_law(
            width_header in 3usize..12,
            l_row_lens in prop::collection::vec(0usize..16, 1..20),
        ) {
            let row_header: Vec<EnumCellValue> =
                (0..width_header).map(|n_idx| txt(&format!("H{n_idx}"))).collect();
            let mut grid = vec![row_header];
            for n_len in &l_row_lens {
                grid.push((0..*n_len).map(|n_idx| txt(&format!("v'{n_idx}\""))).collect());
            }

            let grid_out = transform_grid(&grid).expect("transform");

            prop_assert_eq!(grid_out.len(), l_row_lens.len() + 1);
            for row in &grid_out {
                prop_assert_eq!(row.len(), 3 + 3 * (width_header - 3));
            }
            for row in &grid_out[1..] {
                for cell in row.iter().skip(4).step_by(3) {
                    let c_encoded = cell.as_text().expect("encoded text");
                    prop_assert!(!c_encoded.contains('\'') && !c_encoded.contains('"'));
                }
            }
        }
    }
}
