//! # pdf-report – table, chart and label layout on top of a PDF canvas
//!
//! This crate lays out business reports as PDF documents. The building
//! blocks are:
//!
//! 1. **Canvas** – [`PdfDocument`] records cells, lines, shapes, images
//!    and links page by page, in user units ([`document`])
//! 2. **Tables** – column-based rows with spanning, wrapping, header
//!    repetition and grouping ([`table`], [`group`])
//! 3. **Charts** – stacked bar charts with a computed axis scale, pie
//!    charts and legends ([`chart`], [`scale`])
//! 4. **Navigation** – bookmarks, an index page and a relocatable table
//!    of contents ([`outline`], [`toc`])
//! 5. **Labels** – Avery label sheets ([`label`])
//! 6. **Render** – emit PDF bytes via printpdf, links and outline via
//!    lopdf ([`render`])

pub mod border;
pub mod cell;
pub mod chart;
pub mod color;
pub mod column;
pub mod document;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod group;
pub mod label;
pub mod outline;
pub mod page;
pub mod render;
pub mod samples;
pub mod scale;
pub mod style;
pub mod table;
pub mod toc;

// Re-exports for convenience
pub use border::{Border, RectangleStyle, Sides};
pub use cell::{Cell, CellContent, IconCell, ImageCell};
pub use color::{Color, DrawColor, FillColor, TextColor};
pub use column::Column;
pub use document::{CellMove, DocumentConfig, PdfDocument};
pub use error::{PdfError, Result};
pub use geometry::{Orientation, PageSize, Rectangle, Unit};
pub use group::{Group, GroupListener, GroupTable};
pub use label::{AveryFormat, LabelDocument};
pub use page::{Link, LinkId};
pub use scale::AxisScale;
pub use style::{Alignment, Font, FontName, FontStyle, Line, Style};
pub use table::{CellEvent, Table, TableListener};
pub use toc::TocOptions;
