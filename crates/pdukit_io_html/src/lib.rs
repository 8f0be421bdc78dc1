//! `pdukit_io_html` v1:
//! Static HTML preview of a processed grid.
//!
//! Module layout:
//! - `conf`   : page stylesheet and default title
//! - `render` : grid → HTML document
pub mod conf;
pub mod render;

pub use conf::{C_PAGE_STYLE, C_TITLE_DEFAULT};
pub use render::{SpecHtmlRenderOptions, html_escape_into, render_grid_html, write_grid_html};
