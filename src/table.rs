//! Table builder – rows of cells laid out against a column schema.
//!
//! A row is opened with [`Table::start_row`], filled with cells and closed
//! with [`Table::end_row`], which computes cell widths and the row height,
//! breaks the page when the row does not fit (repeating the headers) and
//! draws every cell: background, border, content, then link.

use std::mem;

use crate::border::{Border, RectangleStyle};
use crate::cell::Cell;
use crate::column::Column;
use crate::document::PdfDocument;
use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::style::{Alignment, Style};

/// Everything known about a cell when it is drawn.
#[derive(Debug, Clone, Copy)]
pub struct CellEvent<'a> {
    /// Index of the cell in its row.
    pub index: usize,
    pub cell: &'a Cell,
    pub bounds: Rectangle,
    pub style: &'a Style,
    pub alignment: Alignment,
    pub border: Border,
}

/// Hooks overriding the default cell and header rendering. Each method
/// returns `true` when it handled the drawing itself.
pub trait TableListener {
    fn draw_cell_background(&mut self, _doc: &mut PdfDocument, _event: &CellEvent<'_>) -> bool {
        false
    }

    fn draw_cell_border(&mut self, _doc: &mut PdfDocument, _event: &CellEvent<'_>) -> bool {
        false
    }

    fn draw_cell_text(&mut self, _doc: &mut PdfDocument, _event: &CellEvent<'_>) -> bool {
        false
    }

    fn draw_headers(&mut self, _doc: &mut PdfDocument, _table: &Table) -> bool {
        false
    }
}

/// A row whose geometry has been computed but which is not drawn yet.
#[derive(Debug, Clone)]
pub(crate) struct PreparedRow {
    cells: Vec<Cell>,
    styles: Vec<Style>,
    alignments: Vec<Alignment>,
    widths: Vec<f32>,
    row_border: Border,
    pub(crate) height: f32,
}

impl PreparedRow {
    pub(crate) fn widths(&self) -> &[f32] {
        &self.widths
    }
}

pub struct Table {
    columns: Vec<Column>,
    cells: Vec<Cell>,
    /// Style of the open row; `None` when no row is started.
    row_style: Option<Style>,
    full_width: bool,
    alignment: Alignment,
    repeat_header: bool,
    header_style: Style,
    listener: Option<Box<dyn TableListener>>,
    in_header: bool,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(true)
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("cells", &self.cells.len())
            .field("full_width", &self.full_width)
            .field("repeat_header", &self.repeat_header)
            .finish()
    }
}

impl Table {
    /// Creates a table; a full-width table stretches its resizable columns
    /// over the printable width.
    pub fn new(full_width: bool) -> Self {
        Self {
            columns: Vec::new(),
            cells: Vec::new(),
            row_style: None,
            full_width,
            alignment: Alignment::Left,
            repeat_header: true,
            header_style: Style::header(),
            listener: None,
            in_header: false,
        }
    }

    // -- configuration ------------------------------------------------------

    pub fn add_column(&mut self, column: Column) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn add_columns(&mut self, columns: impl IntoIterator<Item = Column>) -> &mut Self {
        self.columns.extend(columns);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_full_width(&self) -> bool {
        self.full_width
    }

    pub fn set_full_width(&mut self, full_width: bool) -> &mut Self {
        self.full_width = full_width;
        self
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Horizontal alignment of rows when the table is not full width.
    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self {
        self.alignment = alignment;
        self
    }

    pub fn is_repeat_header(&self) -> bool {
        self.repeat_header
    }

    pub fn set_repeat_header(&mut self, repeat: bool) -> &mut Self {
        self.repeat_header = repeat;
        self
    }

    pub fn header_style(&self) -> Style {
        self.header_style
    }

    pub fn set_header_style(&mut self, style: Style) -> &mut Self {
        self.header_style = style;
        self
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn TableListener>>) -> &mut Self {
        self.listener = listener;
        self
    }

    pub fn take_listener(&mut self) -> Option<Box<dyn TableListener>> {
        self.listener.take()
    }

    // -- rows ---------------------------------------------------------------

    pub fn is_row_started(&self) -> bool {
        self.row_style.is_some()
    }

    /// Opens a row; cells without their own style use `style`, or the
    /// regular cell style.
    pub fn start_row(&mut self, style: Option<Style>) -> Result<&mut Self> {
        if self.is_row_started() {
            return Err(PdfError::RowAlreadyStarted);
        }
        self.row_style = Some(style.unwrap_or_else(Style::cell));
        Ok(self)
    }

    pub fn start_header_row(&mut self) -> Result<&mut Self> {
        self.start_row(Some(self.header_style))
    }

    /// Adds a text cell spanning one column.
    pub fn add(&mut self, text: impl Into<String>) -> Result<&mut Self> {
        self.add_cell(Cell::new(text))
    }

    pub fn add_cell(&mut self, cell: Cell) -> Result<&mut Self> {
        if !self.is_row_started() {
            return Err(PdfError::RowNotStarted);
        }
        self.cells.push(cell);
        Ok(self)
    }

    /// Outputs a whole row of text values.
    pub fn add_row<S: AsRef<str>>(
        &mut self,
        doc: &mut PdfDocument,
        values: &[S],
        style: Option<Style>,
    ) -> Result<()> {
        self.start_row(style)?;
        for value in values {
            self.add(value.as_ref())?;
        }
        self.end_row(doc)
    }

    fn row_span(&self) -> usize {
        self.cells.iter().map(|cell| cell.cols).sum()
    }

    /// Pads the open row with empty cells up to the column count and
    /// optionally ends it.
    pub fn complete_row(&mut self, doc: &mut PdfDocument, end_row: bool) -> Result<()> {
        if !self.is_row_started() {
            return Err(PdfError::RowNotStarted);
        }
        let missing = self.columns.len().saturating_sub(self.row_span());
        self.cells.extend((0..missing).map(|_| Cell::empty()));
        if end_row {
            self.end_row(doc)?;
        }
        Ok(())
    }

    /// Closes the open row, breaking the page if needed, and draws it.
    pub fn end_row(&mut self, doc: &mut PdfDocument) -> Result<()> {
        let row = self.prepare_row(doc)?;
        self.check_new_page(doc, row.height)?;
        self.draw_row(doc, &row)
    }

    /// Outputs the column headers as a row.
    pub fn output_headers(&mut self, doc: &mut PdfDocument) -> Result<()> {
        if self.columns.is_empty() {
            return Err(PdfError::NoColumns);
        }
        if let Some(mut listener) = self.listener.take() {
            let handled = listener.draw_headers(doc, self);
            self.listener = Some(listener);
            if handled {
                return Ok(());
            }
        }

        self.in_header = true;
        let result = self.output_header_row(doc);
        self.in_header = false;
        result
    }

    fn output_header_row(&mut self, doc: &mut PdfDocument) -> Result<()> {
        self.start_header_row()?;
        let cells: Vec<Cell> = self
            .columns
            .iter()
            .map(|column| Cell::new(column.text.clone()).with_alignment(column.alignment))
            .collect();
        self.cells.extend(cells);
        self.end_row(doc)
    }

    /// Adds a page when `height` does not fit on the current one and
    /// repeats the headers. Returns whether a page was added.
    pub fn check_new_page(&mut self, doc: &mut PdfDocument, height: f32) -> Result<bool> {
        if doc.page_no() == 0 {
            doc.add_page();
        }
        if doc.is_printable(height) {
            return Ok(false);
        }
        doc.add_page();
        log::debug!("table row of {height:.2} moved to page {}", doc.page_no());
        if self.repeat_header && !self.in_header {
            self.output_headers(doc)?;
        }
        Ok(true)
    }

    pub(crate) fn is_in_header(&self) -> bool {
        self.in_header
    }

    // -- layout -------------------------------------------------------------

    /// Validates the open row, computes its cell widths and height and
    /// clears the row state.
    pub(crate) fn prepare_row(&mut self, doc: &mut PdfDocument) -> Result<PreparedRow> {
        let Some(row_style) = self.row_style else {
            return Err(PdfError::RowNotStarted);
        };
        if self.cells.is_empty() {
            return Err(PdfError::EmptyRow);
        }
        let span = self.row_span();
        if span != self.columns.len() || self.cells.iter().any(|cell| cell.cols == 0) {
            return Err(PdfError::ColumnSpanMismatch {
                expected: self.columns.len(),
                actual: span,
            });
        }

        let cells = mem::take(&mut self.cells);
        self.row_style = None;

        let mut styles = Vec::with_capacity(cells.len());
        let mut alignments = Vec::with_capacity(cells.len());
        let mut widths = Vec::with_capacity(cells.len());
        let mut fixed = Vec::with_capacity(cells.len());
        let mut index = 0;
        for cell in &cells {
            let spanned = &self.columns[index..index + cell.cols];
            styles.push(cell.style.unwrap_or(row_style));
            alignments.push(cell.alignment.unwrap_or(spanned[0].alignment));
            widths.push(spanned.iter().map(|c| c.width).sum::<f32>());
            fixed.push(spanned.iter().all(|c| c.fixed));
            index += cell.cols;
        }

        if self.full_width {
            let printable = doc.printable_width();
            if widths.len() == 1 {
                widths[0] = printable;
            } else {
                let (fixed_width, resizable_width) = widths.iter().zip(&fixed).fold(
                    (0.0, 0.0),
                    |(f, r), (width, is_fixed)| {
                        if *is_fixed {
                            (f + width, r)
                        } else {
                            (f, r + width)
                        }
                    },
                );
                if resizable_width > 0.0 {
                    let factor = (printable - fixed_width) / resizable_width;
                    for (width, is_fixed) in widths.iter_mut().zip(&fixed) {
                        if !is_fixed {
                            *width *= factor;
                        }
                    }
                }
            }
        }

        let mut height: f32 = 0.0;
        for ((cell, style), width) in cells.iter().zip(&styles).zip(&widths) {
            style.font.apply(doc);
            let content_width = (width - style.indent).max(0.0);
            height = height.max(cell.height(doc, content_width, style.line_height()));
        }

        Ok(PreparedRow {
            cells,
            styles,
            alignments,
            widths,
            row_border: row_style.border,
            height,
        })
    }

    /// Draws a prepared row at the current y and moves below it.
    pub(crate) fn draw_row(&mut self, doc: &mut PdfDocument, row: &PreparedRow) -> Result<()> {
        let mut x = doc.left_margin();
        if !self.full_width {
            let total: f32 = row.widths.iter().sum();
            match self.alignment {
                Alignment::Center => x += (doc.printable_width() - total) / 2.0,
                Alignment::Right => x += doc.printable_width() - total,
                Alignment::Left | Alignment::Justify => {}
            }
        }
        let y = doc.get_y();

        for (index, cell) in row.cells.iter().enumerate() {
            let style = &row.styles[index];
            let bounds = Rectangle::new(x, y, row.widths[index], row.height);
            let border = cell
                .border
                .unwrap_or(style.border)
                .resolve(row.row_border);
            let event = CellEvent {
                index,
                cell,
                bounds,
                style,
                alignment: row.alignments[index],
                border,
            };
            style.apply(doc);

            if style.is_fill_color()
                && !self.notify(doc, |l, d| l.draw_cell_background(d, &event))
            {
                doc.rectangle(&bounds, RectangleStyle::Fill);
            }

            if !border.is_none() && !self.notify(doc, |l, d| l.draw_cell_border(d, &event)) {
                draw_border(doc, &bounds, border);
            }

            let mut lines = 0;
            if !self.notify(doc, |l, d| l.draw_cell_text(d, &event)) {
                let content = bounds.indent(style.indent);
                lines = cell.draw_content(doc, &content, event.alignment, style.line_height())?;
            }

            if let Some(link) = &cell.link {
                let height = if lines > 0 {
                    lines as f32 * style.line_height()
                } else {
                    bounds.height
                };
                let margin = doc.cell_margin();
                doc.link(
                    bounds.x + margin,
                    bounds.y,
                    (bounds.width - 2.0 * margin).max(0.0),
                    height,
                    link.clone(),
                );
            }
            x += row.widths[index];
        }

        doc.set_xy(doc.left_margin(), y + row.height);
        Ok(())
    }

    /// Runs a listener hook, putting the listener back afterwards.
    fn notify<F>(&mut self, doc: &mut PdfDocument, hook: F) -> bool
    where
        F: FnOnce(&mut dyn TableListener, &mut PdfDocument) -> bool,
    {
        let Some(mut listener) = self.listener.take() else {
            return false;
        };
        let handled = hook(listener.as_mut(), doc);
        self.listener = Some(listener);
        handled
    }
}

/// Draws a cell border: one rectangle for all sides, else one line per side.
pub fn draw_border(doc: &mut PdfDocument, bounds: &Rectangle, border: Border) {
    if border.is_rectangle_style() {
        doc.rectangle(bounds, RectangleStyle::Draw);
        return;
    }
    let (x, y, right, bottom) = (bounds.x, bounds.y, bounds.right(), bounds.bottom());
    if border.is_left() {
        doc.line(x, y, x, bottom);
    }
    if border.is_right() {
        doc.line(right, y, right, bottom);
    }
    if border.is_top() {
        doc.line(x, y, right, y);
    }
    if border.is_bottom() {
        doc.line(x, bottom, right, bottom);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::cell::{IconCell, ImageCell};
    use crate::color::Color;
    use crate::document::DocumentConfig;
    use crate::geometry::PageSize;
    use crate::page::{DrawOp, Link};

    /// 110 × 100 mm page: printable width 90, page break at 80.
    fn small_doc() -> PdfDocument {
        let mut doc = PdfDocument::new(DocumentConfig {
            page_size: PageSize::Custom(110.0, 100.0),
            ..DocumentConfig::default()
        });
        doc.add_page();
        doc
    }

    fn drawn_rects(doc: &PdfDocument, page: usize) -> Vec<(f32, f32)> {
        doc.pages()[page]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect {
                    x,
                    width,
                    style: RectangleStyle::Draw,
                    ..
                } => Some((*x, *width)),
                _ => None,
            })
            .collect()
    }

    fn png(width: u32, height: u32) -> ImageCell {
        let img = ::image::RgbImage::new(width, height);
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, ::image::ImageFormat::Png).unwrap();
        ImageCell::from_memory(&bytes.into_inner()).unwrap()
    }

    fn drawn_images(doc: &PdfDocument) -> Vec<(f32, f32, f32, f32)> {
        doc.pages()[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image {
                    x,
                    y,
                    width,
                    height,
                    ..
                } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .collect()
    }

    fn two_columns() -> Table {
        let mut table = Table::new(false);
        table.add_columns([Column::new("Item", 40.0), Column::new("Note", 20.0)]);
        table
    }

    fn three_columns(full_width: bool) -> Table {
        let mut table = Table::new(full_width);
        table.add_columns([
            Column::new("A", 10.0),
            Column::new("B", 20.0),
            Column::new("C", 30.0),
        ]);
        table
    }

    #[test]
    fn row_state_errors() {
        let mut doc = small_doc();
        let mut table = three_columns(true);
        assert!(matches!(table.add("x"), Err(PdfError::RowNotStarted)));
        table.start_row(None).unwrap();
        assert!(matches!(table.start_row(None), Err(PdfError::RowAlreadyStarted)));
        assert!(matches!(table.end_row(&mut doc), Err(PdfError::EmptyRow)));
    }

    #[test]
    fn column_span_must_match() {
        let mut doc = small_doc();
        let mut table = three_columns(true);
        table.start_row(None).unwrap().add("a").unwrap().add("b").unwrap();
        assert!(matches!(
            table.end_row(&mut doc),
            Err(PdfError::ColumnSpanMismatch {
                expected: 3,
                actual: 2
            })
        ));
        table.add("c").unwrap();
        assert!(table.end_row(&mut doc).is_ok());
        assert!(!table.is_row_started());
    }

    #[test]
    fn zero_column_cell_is_rejected() {
        let mut doc = small_doc();
        let mut table = Table::new(true);
        table.add_columns([Column::new("A", 10.0), Column::new("B", 10.0)]);
        table.start_row(None).unwrap();
        table
            .add_cell(Cell {
                cols: 0,
                ..Cell::new("nothing")
            })
            .unwrap();
        table.add("a").unwrap().add("b").unwrap();
        assert!(matches!(
            table.end_row(&mut doc),
            Err(PdfError::ColumnSpanMismatch {
                expected: 2,
                actual: 2
            })
        ));
        assert!(drawn_rects(&doc, 0).is_empty());
    }

    #[test]
    fn spanned_cells_count_their_columns() {
        let mut doc = small_doc();
        let mut table = three_columns(false);
        table.start_row(None).unwrap();
        table.add_cell(Cell::new("wide").with_cols(2)).unwrap();
        table.add("c").unwrap();
        table.end_row(&mut doc).unwrap();
        assert_eq!(drawn_rects(&doc, 0), vec![(10.0, 30.0), (40.0, 30.0)]);
    }

    #[test]
    fn full_width_scales_resizable_columns() {
        let mut doc = small_doc();
        let mut table = three_columns(true);
        table.add_row(&mut doc, &["1", "2", "3"], None).unwrap();
        let widths: Vec<f32> = drawn_rects(&doc, 0).iter().map(|r| r.1).collect();
        assert_eq!(widths.len(), 3);
        assert!((widths.iter().sum::<f32>() - 90.0).abs() < 1e-4);
        assert!((widths[0] - 15.0).abs() < 1e-4);
        assert!((widths[1] - 30.0).abs() < 1e-4);
        assert!((widths[2] - 45.0).abs() < 1e-4);
    }

    #[test]
    fn fixed_columns_keep_their_width() {
        let mut doc = small_doc();
        let mut table = Table::new(true);
        table.add_columns([
            Column::new("Id", 10.0).with_fixed(true),
            Column::new("Name", 20.0),
            Column::new("Value", 20.0),
        ]);
        table.add_row(&mut doc, &["1", "a", "b"], None).unwrap();
        let widths: Vec<f32> = drawn_rects(&doc, 0).iter().map(|r| r.1).collect();
        assert!((widths[0] - 10.0).abs() < 1e-4);
        assert!((widths[1] - 40.0).abs() < 1e-4);
        assert!((widths[2] - 40.0).abs() < 1e-4);
    }

    #[test]
    fn single_cell_takes_printable_width() {
        let mut doc = small_doc();
        let mut table = three_columns(true);
        table.start_row(None).unwrap();
        table.add_cell(Cell::new("all").with_cols(3)).unwrap();
        table.end_row(&mut doc).unwrap();
        assert_eq!(drawn_rects(&doc, 0), vec![(10.0, 90.0)]);
    }

    #[test]
    fn centered_table_is_offset() {
        let mut doc = small_doc();
        let mut table = three_columns(false);
        table.set_alignment(Alignment::Center);
        table.add_row(&mut doc, &["1", "2", "3"], None).unwrap();
        assert_eq!(drawn_rects(&doc, 0)[0].0, 25.0);
    }

    #[test]
    fn complete_row_pads_with_empty_cells() {
        let mut doc = small_doc();
        let mut table = three_columns(true);
        table.start_row(None).unwrap().add("only").unwrap();
        table.complete_row(&mut doc, true).unwrap();
        assert_eq!(drawn_rects(&doc, 0).len(), 3);
    }

    #[test]
    fn headers_need_columns() {
        let mut doc = small_doc();
        let mut table = Table::default();
        assert!(matches!(table.output_headers(&mut doc), Err(PdfError::NoColumns)));
    }

    #[test]
    fn headers_repeat_after_page_break() {
        let mut doc = small_doc();
        let mut table = three_columns(true);
        table.output_headers(&mut doc).unwrap();
        for i in 0..20 {
            table
                .add_row(&mut doc, &[i.to_string(), "x".into(), "y".into()], None)
                .unwrap();
        }
        assert!(doc.page_count() > 1);
        let second: Vec<&str> = doc.pages()[1].texts().collect();
        assert_eq!(&second[..3], &["A", "B", "C"]);
    }

    #[test]
    fn row_height_follows_wrapped_text() {
        let mut doc = small_doc();
        let mut table = three_columns(false);
        let y = doc.get_y();
        table.start_row(None).unwrap();
        table
            .add("a long text that needs several lines in a narrow column")
            .unwrap();
        table.add("b").unwrap().add("c").unwrap();
        table.end_row(&mut doc).unwrap();
        assert!(doc.get_y() - y > 5.0);
        assert_eq!(doc.get_x(), doc.left_margin());
    }

    #[test]
    fn link_area_is_registered() {
        let mut doc = small_doc();
        let mut table = three_columns(true);
        table.start_row(None).unwrap();
        table
            .add_cell(Cell::new("site").with_link("https://example.com"))
            .unwrap();
        table.add("b").unwrap().add("c").unwrap();
        table.end_row(&mut doc).unwrap();
        let links = &doc.pages()[0].links;
        assert!(links
            .iter()
            .any(|l| l.link == Link::Url("https://example.com".into()) && l.height == 5.0));
    }

    #[test]
    fn image_cell_is_inset_by_the_margin() {
        let mut doc = small_doc();
        let mut table = two_columns();
        let y = doc.get_y();
        table.start_row(None).unwrap();
        // 96 × 48 px at 96 dpi: 25.4 × 12.7 mm
        table.add_cell(Cell::image(png(96, 48))).unwrap();
        table.add("x").unwrap();
        table.end_row(&mut doc).unwrap();

        let images = drawn_images(&doc);
        assert_eq!(images.len(), 1);
        let (x, image_y, width, height) = images[0];
        assert!((x - 11.0).abs() < 1e-4);
        assert!((image_y - (y + 1.0)).abs() < 1e-4);
        assert!((width - 25.4).abs() < 1e-3);
        assert!((height - 12.7).abs() < 1e-3);
        assert!((doc.get_y() - (y + 14.7)).abs() < 1e-3);
    }

    #[test]
    fn right_aligned_image_cell() {
        let mut doc = small_doc();
        let mut table = two_columns();
        table.start_row(None).unwrap();
        table
            .add_cell(Cell::image(png(96, 48)).with_alignment(Alignment::Right))
            .unwrap();
        table.add("x").unwrap();
        table.end_row(&mut doc).unwrap();
        let (x, _, width, _) = drawn_images(&doc)[0];
        // column ends at 50, minus the cell margin
        assert!((x + width - 49.0).abs() < 1e-3);
    }

    #[test]
    fn icon_cell_draws_icon_before_text() {
        let mut doc = small_doc();
        let mut table = two_columns();
        let y = doc.get_y();
        table.start_row(None).unwrap();
        table
            .add_cell(Cell::icon(IconCell::new(png(64, 64), "Done")))
            .unwrap();
        table.add("x").unwrap();
        table.end_row(&mut doc).unwrap();

        let images = drawn_images(&doc);
        assert_eq!(images.len(), 1);
        let (icon_x, icon_y, icon_width, icon_height) = images[0];
        assert!((icon_x - 11.0).abs() < 1e-4);
        // resized to fit one 5 mm line, vertically centred in it
        assert!(icon_height <= 5.0);
        assert!((icon_y - y - (5.0 - icon_height) / 2.0).abs() < 1e-4);
        let text_x = doc.pages()[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x, text, .. } if text == "Done" => Some(*x),
                _ => None,
            })
            .unwrap();
        assert!(text_x > icon_x + icon_width);
        assert!((doc.get_y() - (y + 5.0)).abs() < 1e-4);
    }

    #[test]
    fn icon_cell_height_follows_wrapped_text() {
        let mut doc = small_doc();
        let mut table = two_columns();
        let y = doc.get_y();
        let text = "a status text far too long for a single line";
        table.start_row(None).unwrap();
        table
            .add_cell(Cell::icon(IconCell::new(png(64, 64), text)))
            .unwrap();
        table.add("x").unwrap();
        table.end_row(&mut doc).unwrap();

        let lines = (doc.get_y() - y) / 5.0;
        assert!(lines >= 2.0);
        assert!((lines - lines.round()).abs() < 1e-4);
        let (_, _, icon_width, _) = drawn_images(&doc)[0];
        let narrower = doc.get_lines_count(text, 40.0 - icon_width - doc.cell_margin());
        assert_eq!(lines.round() as usize, narrower);
    }

    #[test]
    fn background_is_filled_before_the_text() {
        let mut doc = small_doc();
        let mut table = two_columns();
        table.start_row(None).unwrap();
        table
            .add_cell(Cell::new("shaded").with_background(Color::RED))
            .unwrap();
        table.add("plain").unwrap();
        table.end_row(&mut doc).unwrap();

        let ops = &doc.pages()[0].ops;
        let fills: Vec<usize> = ops
            .iter()
            .enumerate()
            .filter_map(|(i, op)| match op {
                DrawOp::Rect {
                    x,
                    width,
                    style: RectangleStyle::Fill,
                    ..
                } if *x == 10.0 && *width == 40.0 => Some(i),
                _ => None,
            })
            .collect();
        let text = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Text { text, .. } if text == "shaded"))
            .unwrap();
        assert_eq!(fills.len(), 1);
        assert!(fills[0] < text);
        // only the shaded cell is filled
        let all_fills = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { style: RectangleStyle::Fill, .. }))
            .count();
        assert_eq!(all_fills, 1);
    }

    #[derive(Default)]
    struct Recorder {
        backgrounds: Rc<RefCell<usize>>,
    }

    impl TableListener for Recorder {
        fn draw_cell_background(&mut self, _doc: &mut PdfDocument, _event: &CellEvent<'_>) -> bool {
            *self.backgrounds.borrow_mut() += 1;
            true
        }

        fn draw_cell_border(&mut self, _doc: &mut PdfDocument, event: &CellEvent<'_>) -> bool {
            event.index == 0
        }
    }

    #[test]
    fn listener_intercepts_drawing() {
        let mut doc = small_doc();
        let mut table = three_columns(true);
        let counter = Rc::new(RefCell::new(0));
        table.set_listener(Some(Box::new(Recorder {
            backgrounds: counter.clone(),
        })));
        table.output_headers(&mut doc).unwrap();
        // header cells are filled, each intercepted
        assert_eq!(*counter.borrow(), 3);
        assert!(!doc.pages()[0].ops.iter().any(|op| matches!(
            op,
            DrawOp::Rect {
                style: RectangleStyle::Fill,
                ..
            }
        )));
        // the first border is skipped
        assert_eq!(drawn_rects(&doc, 0).len(), 2);
    }
}
