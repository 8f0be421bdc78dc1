//! Grid → HTML document.

use std::fs;
use std::io;
use std::path::Path;

use pdukit_table::EnumCellValue;
use tracing::debug;

use crate::conf::{C_PAGE_STYLE, C_TITLE_DEFAULT};

/// Options for [`render_grid_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecHtmlRenderOptions {
    /// Page `<title>` and heading text.
    pub title: String,
    /// Render the inline stylesheet.
    pub if_include_style: bool,
}

impl Default for SpecHtmlRenderOptions {
    fn default() -> Self {
        Self {
            title: C_TITLE_DEFAULT.to_string(),
            if_include_style: true,
        }
    }
}

/// Render `grid` as a complete HTML page.
///
/// Row 0 becomes the `<thead>` row; every cell is escaped.
pub fn render_grid_html(grid: &[Vec<EnumCellValue>], options: &SpecHtmlRenderOptions) -> String {
    let n_cells: usize = grid.iter().map(Vec::len).sum();
    let mut out = String::with_capacity(1024 + n_cells * 32);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    out.push_str("<title>");
    html_escape_into(&mut out, &options.title);
    out.push_str("</title>\n");
    if options.if_include_style {
        out.push_str("<style>\n");
        out.push_str(C_PAGE_STYLE);
        out.push_str("</style>\n");
    }
    out.push_str("</head>\n<body>\n<div class=\"container\">\n<h1>");
    html_escape_into(&mut out, &options.title);
    out.push_str("</h1>\n<div class=\"table-container\">\n");
    out.push_str("<table class=\"processed-table\">\n");

    if let Some((row_header, rows_body)) = grid.split_first() {
        out.push_str("<thead>\n");
        write_row_into(&mut out, row_header, "th");
        out.push_str("</thead>\n<tbody>\n");
        for row in rows_body {
            write_row_into(&mut out, row, "td");
        }
        out.push_str("</tbody>\n");
    }

    out.push_str("</table>\n</div>\n</div>\n</body>\n</html>\n");
    out
}

/// Render `grid` and write the page to `path`.
///
/// # Errors
/// Propagates filesystem errors.
pub fn write_grid_html(
    path: impl AsRef<Path>,
    grid: &[Vec<EnumCellValue>],
    options: &SpecHtmlRenderOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let c_html = render_grid_html(grid, options);
    fs::write(path, &c_html)?;
    debug!(path = %path.display(), n_bytes = c_html.len(), "html preview written");
    Ok(())
}

/// HTML-escape a string into the output buffer.
pub fn html_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

fn write_row_into(out: &mut String, row: &[EnumCellValue], tag: &str) {
    out.push_str("<tr>");
    for cell in row {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        html_escape_into(out, &cell.to_display_text());
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
    out.push_str("</tr>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txt(val: &str) -> EnumCellValue {
        EnumCellValue::from(val)
    }

    #[test]
    fn test_html_escape_into() {
        let mut out = String::new();
        html_escape_into(&mut out, r#"<b>"Tom" & 'Jerry'</b>"#);
        assert_eq!(
            out,
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_grid_html_uses_th_for_header_and_td_for_body() {
        let grid = vec![
            vec![txt("Name"), txt("Msg (PDU)")],
            vec![txt("Ann"), EnumCellValue::Number(2.0)],
        ];
        let c_html = render_grid_html(&grid, &SpecHtmlRenderOptions::default());

        assert!(c_html.starts_with("<!DOCTYPE html>"));
        assert!(c_html.contains("<title>Processed File</title>"));
        assert!(c_html.contains("<table class=\"processed-table\">"));
        assert!(c_html.contains("<tr><th>Name</th><th>Msg (PDU)</th></tr>"));
        assert!(c_html.contains("<tr><td>Ann</td><td>2</td></tr>"));
    }

    #[test]
    fn test_render_grid_html_escapes_hostile_cells() {
        let grid = vec![
            vec![txt("<script>alert(1)</script>")],
            vec![txt("a & b")],
        ];
        let c_html = render_grid_html(&grid, &SpecHtmlRenderOptions::default());

        assert!(!c_html.contains("<script>"));
        assert!(c_html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(c_html.contains("<td>a &amp; b</td>"));
    }

    #[test]
    fn test_render_grid_html_empty_cells_and_grid() {
        let grid = vec![vec![txt("H")], vec![EnumCellValue::None]];
        let c_html = render_grid_html(&grid, &SpecHtmlRenderOptions::default());
        assert!(c_html.contains("<tr><td></td></tr>"));

        let c_html_empty = render_grid_html(&[], &SpecHtmlRenderOptions::default());
        assert!(!c_html_empty.contains("<thead>"));
        assert!(c_html_empty.contains("</table>"));
    }

    #[test]
    fn test_render_grid_html_without_style() {
        let options = SpecHtmlRenderOptions {
            title: "Preview".to_string(),
            if_include_style: false,
        };
        let c_html = render_grid_html(&[vec![txt("H")]], &options);
        assert!(!c_html.contains("<style>"));
        assert!(c_html.contains("<h1>Preview</h1>"));
    }

    #[test]
    fn test_write_grid_html_writes_file() {
        let path = std::env::temp_dir().join(format!(
            "pdukit_html_test_{}.html",
            std::process::id()
        ));
        write_grid_html(&path, &[vec![txt("H")]], &SpecHtmlRenderOptions::default())
            .expect("write html");
        let c_read = std::fs::read_to_string(&path).expect("read html");
        let _ = std::fs::remove_file(&path);
        assert!(c_read.contains("<th>H</th>"));
    }
}
