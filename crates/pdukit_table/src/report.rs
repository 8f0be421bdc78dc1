//! Transform report model and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Per-row counters produced by the row kernel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpecRowStats {
    /// Non-empty cells encoded in this row.
    pub cnt_cells_encoded: u64,
    /// Empty cells emitted with the degenerate triple.
    pub cnt_cells_empty: u64,
    /// Sum of segment counts written for this row.
    pub cnt_segments: u64,
    /// Row was shorter than the header.
    pub if_padded: bool,
    /// Row carried non-blank cells beyond the header width.
    pub if_truncated: bool,
}

/// Aggregate counters and diagnostics for one transform run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportTransform {
    /// Data rows processed (header excluded).
    pub cnt_rows: u64,
    /// Source columns expanded into triples.
    pub cnt_cols_expanded: u64,
    /// Non-empty cells encoded.
    pub cnt_cells_encoded: u64,
    /// Empty cells.
    pub cnt_cells_empty: u64,
    /// Rows shorter than the header.
    pub cnt_rows_padded: u64,
    /// Rows with data beyond the header width.
    pub cnt_rows_truncated: u64,
    /// Sum of all segment counts.
    pub cnt_segments: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl ReportTransform {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_rows".to_string(), self.cnt_rows);
        dict_counts.insert("cnt_cols_expanded".to_string(), self.cnt_cols_expanded);
        dict_counts.insert("cnt_cells_encoded".to_string(), self.cnt_cells_encoded);
        dict_counts.insert("cnt_cells_empty".to_string(), self.cnt_cells_empty);
        dict_counts.insert("cnt_rows_padded".to_string(), self.cnt_rows_padded);
        dict_counts.insert("cnt_rows_truncated".to_string(), self.cnt_rows_truncated);
        dict_counts.insert("cnt_segments".to_string(), self.cnt_segments);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} rows={} cols_expanded={} encoded={} empty={} padded={} truncated={} \
             segments={} warnings={}",
            self.cnt_rows,
            self.cnt_cols_expanded,
            self.cnt_cells_encoded,
            self.cnt_cells_empty,
            self.cnt_rows_padded,
            self.cnt_rows_truncated,
            self.cnt_segments,
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[TRANSFORM]"))
    }
}

/// Mutable accumulator for transform statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportTransformBuilder {
    cnt_rows: u64,
    cnt_cols_expanded: u64,
    cnt_cells_encoded: u64,
    cnt_cells_empty: u64,
    cnt_rows_padded: u64,
    cnt_rows_truncated: u64,
    cnt_segments: u64,
    warnings: Vec<String>,
}

impl ReportTransformBuilder {
    /// Start a report for a header with `cnt_cols_expanded` expanded columns.
    pub fn new(cnt_cols_expanded: u64) -> Self {
        Self {
            cnt_cols_expanded,
            ..Self::default()
        }
    }

    /// Fold one row's counters into the report.
    ///
    /// `idx_row` is the 1-based grid row index, used in warnings.
    pub fn add_row(&mut self, idx_row: usize, stats: &SpecRowStats) {
        self.cnt_rows += 1;
        self.cnt_cells_encoded += stats.cnt_cells_encoded;
        self.cnt_cells_empty += stats.cnt_cells_empty;
        self.cnt_segments += stats.cnt_segments;
        if stats.if_padded {
            self.cnt_rows_padded += 1;
        }
        if stats.if_truncated {
            self.cnt_rows_truncated += 1;
            self.warnings.push(format!(
                "Row {idx_row}: cells beyond the header width were dropped."
            ));
        }
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportTransform {
        ReportTransform {
            cnt_rows: self.cnt_rows,
            cnt_cols_expanded: self.cnt_cols_expanded,
            cnt_cells_encoded: self.cnt_cells_encoded,
            cnt_cells_empty: self.cnt_cells_empty,
            cnt_rows_padded: self.cnt_rows_padded,
            cnt_rows_truncated: self.cnt_rows_truncated,
            cnt_segments: self.cnt_segments,
            warnings: self.warnings,
        }
    }
}
