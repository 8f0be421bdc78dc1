//! HTML page constants.

/// Default page title.
pub const C_TITLE_DEFAULT: &str = "Processed File";

/// Inline stylesheet for the preview page.
pub const C_PAGE_STYLE: &str = r#"body {
  font-family: Arial, sans-serif;
  margin: 0;
  padding: 0;
  background-color: #f9f9f9;
}
.container {
  padding: 20px;
}
.table-container {
  overflow-x: auto;
  max-height: 90vh;
}
.processed-table {
  border-collapse: collapse;
  width: 100%;
  font-size: 14px;
}
.processed-table th,
.processed-table td {
  border: 1px solid #ddd;
  padding: 8px;
  text-align: left;
  vertical-align: top;
  min-width: 200px;
  word-break: break-word;
}
.processed-table th {
  background-color: #f4f4f4;
  position: sticky;
  top: 0;
}
"#;
