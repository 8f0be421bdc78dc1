//! `pdukit_table` v1:
//! Grid model and the column-expansion transform.
//!
//! Module layout:
//! - `spec`      : cell/grid models, options, errors
//! - `report`    : per-run report model and builder
//! - `util`      : per-cell helpers and output-shape planning
//! - `transform` : header/row expansion kernel
pub mod report;
pub mod spec;
pub mod transform;
pub mod util;

pub use report::{ReportTransform, ReportTransformBuilder};
pub use spec::{
    EnumCellValue, Grid, SpecTransformOptions, SpecTransformOutput, TransformError,
    C_SUFFIX_ENCODED_DEFAULT, C_SUFFIX_PDU_DEFAULT, N_COLS_PASSTHROUGH_DEFAULT,
};
pub use transform::{transform_grid, transform_grid_with_options, validate_grid_shape};
pub use util::{
    calculate_cell_sms_parts, derive_output_width, derive_pdu_column_indices, encode_cell_value,
};
