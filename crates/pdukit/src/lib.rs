//! `pdukit` v1:
//! Spreadsheet SMS-encoding pipeline: read → transform → write.
//!
//! Module layout:
//! - `spec`     : pipeline options, output, report and errors
//! - `pipeline` : orchestration over the reader, transformer and sinks
pub mod pipeline;
pub mod spec;

pub use pdukit_io_html as io_html;
pub use pdukit_io_xlsx as io_xlsx;
pub use pdukit_sms as sms;
pub use pdukit_table as table;

pub use pipeline::{derive_default_output_path, process_grid, process_xlsx_file};
pub use spec::{ProcessError, ReportProcess, SpecProcessOptions, SpecProcessOutput};
