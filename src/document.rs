//! Recording PDF canvas.
//!
//! [`PdfDocument`] is the mutable drawing surface every layout component
//! writes to. It keeps the current position, style state and the page
//! buffer; drawing calls are recorded as [`DrawOp`]s and turned into PDF
//! bytes by [`crate::render`] when the document is output.

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::border::{Border, RectangleStyle, Sides};
use crate::color::Color;
use crate::error::{PdfError, Result};
use crate::fonts::{wrap_text, FontManager};
use crate::geometry::{Orientation, PageSize, Rectangle, Unit};
use crate::outline::Bookmark;
use crate::page::{DrawOp, Link, LinkArea, LinkId, LinkTarget, Page};
use crate::render;
use crate::style::{Alignment, Font, Line};
use crate::toc::TocState;

/// Maximum angular step, in degrees, used to approximate arcs.
const ARC_STEP_DEGREES: f32 = 5.0;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration of a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    pub page_size: PageSize,
    pub orientation: Orientation,
    /// User unit for every coordinate passed to the document.
    pub unit: Unit,
    pub left_margin: f32,
    pub top_margin: f32,
    pub right_margin: f32,
    /// Distance from the bottom edge that triggers an automatic page break.
    pub bottom_margin: f32,
    /// Horizontal padding inside cells.
    pub cell_margin: f32,
    pub font: Font,
    pub auto_page_break: bool,
    /// Print the page number in the footer of every page.
    pub page_numbers: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "Report".to_string(),
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            unit: Unit::Mm,
            left_margin: 10.0,
            top_margin: 10.0,
            right_margin: 10.0,
            bottom_margin: 20.0,
            cell_margin: 1.0,
            font: Font::default(),
            auto_page_break: true,
            page_numbers: false,
        }
    }
}

impl DocumentConfig {
    /// Effective page width, in user units, after applying orientation.
    pub fn effective_width(&self) -> f32 {
        let (w, h) = self.page_size.dimensions_mm();
        let mm = match self.orientation {
            Orientation::Portrait => w,
            Orientation::Landscape => h,
        };
        mm / self.unit.mm_factor()
    }

    /// Effective page height, in user units, after applying orientation.
    pub fn effective_height(&self) -> f32 {
        let (w, h) = self.page_size.dimensions_mm();
        let mm = match self.orientation {
            Orientation::Portrait => h,
            Orientation::Landscape => w,
        };
        mm / self.unit.mm_factor()
    }

    pub fn landscape() -> Self {
        Self {
            orientation: Orientation::Landscape,
            ..Self::default()
        }
    }
}

/// Where the cursor goes after a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellMove {
    /// To the right of the cell.
    #[default]
    Right,
    /// To the beginning of the next line.
    NextLine,
    /// Below the cell, keeping the same x.
    Below,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A document under construction.
pub struct PdfDocument {
    config: DocumentConfig,
    k: f32,
    width: f32,
    height: f32,
    left_margin: f32,
    top_margin: f32,
    right_margin: f32,
    bottom_margin: f32,
    cell_margin: f32,
    auto_page_break: bool,
    pages: Vec<Page>,
    page: usize,
    x: f32,
    y: f32,
    last_height: f32,
    font: Font,
    draw_color: Color,
    fill_color: Color,
    text_color: Color,
    line_width: f32,
    dash: Option<(f32, f32)>,
    fonts: FontManager,
    links: Vec<LinkTarget>,
    in_footer: bool,
    closed: bool,
    pub(crate) bookmarks: Vec<Bookmark>,
    pub(crate) toc: TocState,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new(DocumentConfig::default())
    }
}

impl PdfDocument {
    pub fn new(config: DocumentConfig) -> Self {
        let k = config.unit.scale_factor();
        let width = config.effective_width();
        let height = config.effective_height();
        Self {
            k,
            width,
            height,
            left_margin: config.left_margin,
            top_margin: config.top_margin,
            right_margin: config.right_margin,
            bottom_margin: config.bottom_margin,
            cell_margin: config.cell_margin,
            auto_page_break: config.auto_page_break,
            pages: Vec::new(),
            page: 0,
            x: config.left_margin,
            y: config.top_margin,
            last_height: 0.0,
            font: config.font,
            draw_color: Color::BLACK,
            fill_color: Color::WHITE,
            text_color: Color::BLACK,
            line_width: Line::DEFAULT_WIDTH,
            dash: None,
            fonts: FontManager::default(),
            links: Vec::new(),
            in_footer: false,
            closed: false,
            bookmarks: Vec::new(),
            toc: TocState::default(),
            config,
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// Number of points per user unit.
    pub fn scale_factor(&self) -> f32 {
        self.k
    }

    pub fn fonts(&self) -> &FontManager {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontManager {
        &mut self.fonts
    }

    // -- page geometry ------------------------------------------------------

    pub fn page_width(&self) -> f32 {
        self.width
    }

    pub fn page_height(&self) -> f32 {
        self.height
    }

    pub fn left_margin(&self) -> f32 {
        self.left_margin
    }

    pub fn right_margin(&self) -> f32 {
        self.right_margin
    }

    pub fn top_margin(&self) -> f32 {
        self.top_margin
    }

    pub fn bottom_margin(&self) -> f32 {
        self.bottom_margin
    }

    pub fn set_margins(&mut self, left: f32, top: f32, right: f32) {
        self.left_margin = left;
        self.top_margin = top;
        self.right_margin = right;
    }

    pub fn set_left_margin(&mut self, margin: f32) {
        self.left_margin = margin;
        if self.page > 0 && self.x < margin {
            self.x = margin;
        }
    }

    pub fn set_auto_page_break(&mut self, enabled: bool, margin: f32) {
        self.auto_page_break = enabled;
        self.bottom_margin = margin;
    }

    /// Y position beyond which content no longer fits on the page.
    pub fn page_break_trigger(&self) -> f32 {
        self.height - self.bottom_margin
    }

    pub fn printable_width(&self) -> f32 {
        self.width - self.left_margin - self.right_margin
    }

    pub fn printable_height(&self) -> f32 {
        self.page_break_trigger() - self.top_margin
    }

    pub fn cell_margin(&self) -> f32 {
        self.cell_margin
    }

    pub fn set_cell_margin(&mut self, margin: f32) {
        self.cell_margin = margin.max(0.0);
    }

    /// Printable area of the current page.
    pub fn printable_bounds(&self) -> Rectangle {
        Rectangle::new(
            self.left_margin,
            self.top_margin,
            self.printable_width(),
            self.printable_height(),
        )
    }

    // -- pages --------------------------------------------------------------

    /// Current page number (1-based, 0 before the first page).
    pub fn page_no(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub(crate) fn pages_mut(&mut self) -> &mut Vec<Page> {
        &mut self.pages
    }

    pub(crate) fn set_page_no(&mut self, page: usize) {
        self.page = page.min(self.pages.len());
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.page.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    /// Starts a new page, finishing the current one.
    pub fn add_page(&mut self) {
        if self.page > 0 {
            self.finish_page();
        }
        self.pages.push(Page::default());
        self.page = self.pages.len();
        self.x = self.left_margin;
        self.y = self.top_margin;
        if self.toc.numbering {
            self.toc.numbered_page += 1;
        }
        // restore the graphic state on the new page
        self.out(DrawOp::SetLineWidth(self.line_width));
        self.out(DrawOp::SetFont(self.font));
        self.out(DrawOp::SetDrawColor(self.draw_color));
        self.out(DrawOp::SetFillColor(self.fill_color));
        self.out(DrawOp::SetTextColor(self.text_color));
        log::debug!("page {} started", self.page);
    }

    /// Whether `height` fits between the current y and the page break trigger.
    pub fn is_printable(&self, height: f32) -> bool {
        self.is_printable_at(height, self.y)
    }

    pub fn is_printable_at(&self, height: f32, y: f32) -> bool {
        y + height <= self.page_break_trigger()
    }

    fn finish_page(&mut self) {
        let Some(text) = self.footer_text() else {
            return;
        };
        let (x, y, font, color) = (self.x, self.y, self.font, self.text_color);
        self.in_footer = true;
        self.set_font(font.regular().italic().with_size(8.0));
        self.set_text_color(Color::BLACK);
        self.set_xy(self.left_margin, self.height - self.bottom_margin * 0.75);
        self.cell(0.0, 7.0, &text, Border::None, CellMove::Right, Alignment::Center, false, None);
        self.set_font(font);
        self.set_text_color(color);
        self.set_xy(x, y);
        self.in_footer = false;
        if !self.toc.numbering {
            self.toc.numbering_footer = false;
        }
    }

    fn footer_text(&self) -> Option<String> {
        if self.toc.numbering_footer {
            Some(self.toc.numbered_page.to_string())
        } else if self.config.page_numbers {
            Some(self.page.to_string())
        } else {
            None
        }
    }

    /// Finishes the last page. Further drawing calls are still recorded.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if self.page == 0 {
            self.add_page();
        }
        self.finish_page();
        self.closed = true;
    }

    /// Closes the document and renders it into PDF bytes.
    pub fn output(&mut self) -> Result<Vec<u8>> {
        self.close();
        render::render_pdf(self)
    }

    /// Serialise the page buffer to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.pages).unwrap_or_default()
    }

    fn out(&mut self, op: DrawOp) {
        if self.page == 0 {
            if !op.is_shape() {
                return;
            }
            self.add_page();
        }
        if let Some(page) = self.pages.get_mut(self.page - 1) {
            page.ops.push(op);
        }
    }

    // -- position -----------------------------------------------------------

    pub fn get_x(&self) -> f32 {
        self.x
    }

    pub fn get_y(&self) -> f32 {
        self.y
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = if x >= 0.0 { x } else { self.width + x };
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = if y >= 0.0 { y } else { self.height + y };
    }

    pub fn set_xy(&mut self, x: f32, y: f32) {
        self.set_x(x);
        self.set_y(y);
    }

    /// Line break: back to the left margin, down by `height` or by the
    /// height of the last cell.
    pub fn ln(&mut self, height: Option<f32>) {
        self.x = self.left_margin;
        self.y += height.unwrap_or(self.last_height);
    }

    // -- graphic state ------------------------------------------------------

    pub fn font(&self) -> Font {
        self.font
    }

    /// Current font size in user units.
    pub fn font_size(&self) -> f32 {
        self.font.size / self.k
    }

    pub fn set_font(&mut self, font: Font) {
        if self.font == font && self.page > 0 {
            return;
        }
        self.font = font;
        self.out(DrawOp::SetFont(font));
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.set_font(self.font.with_size(size));
    }

    pub fn draw_color(&self) -> Color {
        self.draw_color
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
        self.out(DrawOp::SetDrawColor(color));
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
        self.out(DrawOp::SetFillColor(color));
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
        self.out(DrawOp::SetTextColor(color));
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
        self.out(DrawOp::SetLineWidth(width));
    }

    /// Dash length and gap for subsequent lines; `None` draws solid lines.
    pub fn set_dash_pattern(&mut self, pattern: Option<(f32, f32)>) {
        self.dash = pattern.filter(|(dash, gap)| *dash > 0.0 && *gap >= 0.0);
    }

    // -- measurement --------------------------------------------------------

    /// Width of a string in user units with the current font.
    pub fn get_string_width(&self, text: &str) -> f32 {
        self.fonts.measure_text_width(text, &self.font) / self.k
    }

    /// Splits text into the lines a multi-line cell of `width` would print.
    pub fn split_lines(&self, text: &str, width: f32) -> Vec<String> {
        let max_width = width - 2.0 * self.cell_margin;
        wrap_text(text, max_width, |s| self.get_string_width(s))
    }

    /// Number of lines a multi-line cell of `width` needs; empty text
    /// counts as one line.
    pub fn get_lines_count(&self, text: &str, width: f32) -> usize {
        if text.is_empty() {
            return 1;
        }
        self.split_lines(text, width).len()
    }

    /// Converts pixels (96 dpi) to user units.
    pub fn pixels_to_user_unit(&self, pixels: f32) -> f32 {
        pixels * 72.0 / 96.0 / self.k
    }

    pub fn points_to_user_unit(&self, points: f32) -> f32 {
        points / self.k
    }

    // -- drawing ------------------------------------------------------------

    /// Prints a single-line cell.
    #[allow(clippy::too_many_arguments)]
    pub fn cell(
        &mut self,
        width: f32,
        height: f32,
        text: &str,
        border: Border,
        movement: CellMove,
        align: Alignment,
        fill: bool,
        link: Option<Link>,
    ) {
        if self.page == 0 {
            self.add_page();
        }
        if self.auto_page_break && !self.in_footer && !self.is_printable(height) {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
        let width = if width <= 0.0 {
            self.width - self.right_margin - self.x
        } else {
            width
        };
        let (x, y) = (self.x, self.y);

        match border.rectangle_style(fill) {
            Some(style) if fill || border.is_rectangle_style() => {
                self.rect(x, y, width, height, style);
            }
            _ => {}
        }
        if !border.is_rectangle_style() {
            self.draw_sides(&Rectangle::new(x, y, width, height), border.sides());
        }

        if !text.is_empty() {
            let text_width = self.get_string_width(text);
            let dx = match align {
                Alignment::Right => width - self.cell_margin - text_width,
                Alignment::Center => (width - text_width) / 2.0,
                Alignment::Left | Alignment::Justify => self.cell_margin,
            };
            let font_size = self.font_size();
            self.out(DrawOp::Text {
                x: x + dx,
                y: y + 0.5 * height + 0.3 * font_size,
                text: text.to_string(),
                angle: 0.0,
            });
            if let Some(link) = link {
                self.link(x + dx, y + 0.5 * height - 0.5 * font_size, text_width, font_size, link);
            }
        }

        self.last_height = height;
        match movement {
            CellMove::Right => self.x += width,
            CellMove::NextLine => {
                self.x = self.left_margin;
                self.y += height;
            }
            CellMove::Below => self.y += height,
        }
    }

    /// Prints word-wrapped text, one cell per line. Returns the line count.
    pub fn multi_cell(
        &mut self,
        width: f32,
        height: f32,
        text: &str,
        border: Border,
        align: Alignment,
        fill: bool,
    ) -> usize {
        let width = if width <= 0.0 {
            self.width - self.right_margin - self.x
        } else {
            width
        };
        let lines = self.split_lines(text, width);
        let count = lines.len();
        let sides = border.sides();
        let x = self.x;
        for (index, line) in lines.iter().enumerate() {
            let mut line_sides = sides & (Sides::LEFT | Sides::RIGHT);
            if index == 0 {
                line_sides |= sides & Sides::TOP;
            }
            if index + 1 == count {
                line_sides |= sides & Sides::BOTTOM;
            }
            self.cell(
                width,
                height,
                line,
                Border::Sides(line_sides),
                CellMove::Below,
                align,
                fill,
                None,
            );
            self.x = x;
        }
        self.x = self.left_margin;
        count
    }

    fn draw_sides(&mut self, bounds: &Rectangle, sides: Sides) {
        if sides.contains(Sides::LEFT) {
            self.line(bounds.x, bounds.y, bounds.x, bounds.bottom());
        }
        if sides.contains(Sides::TOP) {
            self.line(bounds.x, bounds.y, bounds.right(), bounds.y);
        }
        if sides.contains(Sides::RIGHT) {
            self.line(bounds.right(), bounds.y, bounds.right(), bounds.bottom());
        }
        if sides.contains(Sides::BOTTOM) {
            self.line(bounds.x, bounds.bottom(), bounds.right(), bounds.bottom());
        }
    }

    /// Draws a line, dashed when a dash pattern is set.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let Some((dash, gap)) = self.dash else {
            self.out(DrawOp::Line { x1, y1, x2, y2 });
            return;
        };
        let length = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
        if length <= f32::EPSILON {
            return;
        }
        let (ux, uy) = ((x2 - x1) / length, (y2 - y1) / length);
        let mut start = 0.0;
        while start < length {
            let end = (start + dash).min(length);
            self.out(DrawOp::Line {
                x1: x1 + ux * start,
                y1: y1 + uy * start,
                x2: x1 + ux * end,
                y2: y1 + uy * end,
            });
            start = end + gap;
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, style: RectangleStyle) {
        if self.dash.is_some() && style.is_draw() {
            if style.is_fill() {
                self.out(DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    style: RectangleStyle::Fill,
                });
            }
            self.draw_sides(&Rectangle::new(x, y, width, height), Sides::all());
            return;
        }
        self.out(DrawOp::Rect {
            x,
            y,
            width,
            height,
            style,
        });
    }

    pub fn rectangle(&mut self, bounds: &Rectangle, style: RectangleStyle) {
        self.rect(bounds.x, bounds.y, bounds.width, bounds.height, style);
    }

    pub fn polygon(&mut self, points: &[(f32, f32)], style: RectangleStyle) {
        if points.len() < 2 {
            return;
        }
        self.out(DrawOp::Polygon {
            points: points.to_vec(),
            style,
        });
    }

    pub fn circle(&mut self, x: f32, y: f32, radius: f32, style: RectangleStyle) {
        if radius <= 0.0 {
            return;
        }
        let steps = (360.0 / ARC_STEP_DEGREES) as usize;
        let points: Vec<(f32, f32)> = (0..steps)
            .map(|i| {
                let angle = (i as f32 * ARC_STEP_DEGREES).to_radians();
                (x + radius * angle.cos(), y - radius * angle.sin())
            })
            .collect();
        self.polygon(&points, style);
    }

    /// Draws a pie sector between two angles (degrees), measured from
    /// `origin` (90 = top) in the given direction.
    #[allow(clippy::too_many_arguments)]
    pub fn sector(
        &mut self,
        xc: f32,
        yc: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        style: RectangleStyle,
        clockwise: bool,
        origin: f32,
    ) {
        let sweep = end_angle - start_angle;
        if radius <= 0.0 || sweep.abs() <= f32::EPSILON {
            return;
        }
        let steps = (sweep.abs() / ARC_STEP_DEGREES).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push((xc, yc));
        for i in 0..=steps {
            let angle = start_angle + sweep * i as f32 / steps as f32;
            let theta = if clockwise {
                origin - angle
            } else {
                origin + angle
            }
            .to_radians();
            points.push((xc + radius * theta.cos(), yc - radius * theta.sin()));
        }
        self.polygon(&points, style);
    }

    /// Prints text at a baseline position.
    pub fn text(&mut self, x: f32, y: f32, text: &str) {
        self.rotated_text(text, x, y, 0.0);
    }

    /// Prints text rotated counter-clockwise by `angle` degrees around its
    /// baseline origin.
    pub fn rotated_text(&mut self, text: &str, x: f32, y: f32, angle: f32) {
        if text.is_empty() {
            return;
        }
        self.out(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            angle,
        });
    }

    /// Places an image from a file path or a `data:` URI. A zero width or
    /// height is derived from the pixel size of the image.
    pub fn image(
        &mut self,
        source: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        link: Option<Link>,
    ) -> Result<()> {
        if !source.starts_with("data:") && !std::path::Path::new(source).exists() {
            return Err(PdfError::ImageNotFound(source.into()));
        }
        let (width, height) = if width <= 0.0 || height <= 0.0 {
            let (px_width, px_height) = render::image_dimensions(source)?;
            let natural_w = self.pixels_to_user_unit(px_width as f32);
            let natural_h = self.pixels_to_user_unit(px_height as f32);
            match (width > 0.0, height > 0.0) {
                (true, false) => (width, width * natural_h / natural_w.max(f32::EPSILON)),
                (false, true) => (height * natural_w / natural_h.max(f32::EPSILON), height),
                _ => (natural_w, natural_h),
            }
        } else {
            (width, height)
        };
        self.out(DrawOp::Image {
            source: source.to_string(),
            x,
            y,
            width,
            height,
        });
        if let Some(link) = link {
            self.link(x, y, width, height, link);
        }
        Ok(())
    }

    /// Places an image held in memory (PNG or JPEG bytes).
    pub fn image_memory(
        &mut self,
        data: &[u8],
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()> {
        let mime = if data.starts_with(&[0xFF, 0xD8]) {
            "image/jpeg"
        } else {
            "image/png"
        };
        let uri = format!("data:{mime};base64,{}", BASE64_STD.encode(data));
        self.image(&uri, x, y, width, height, None)
    }

    // -- links --------------------------------------------------------------

    /// Registers a clickable area on the current page.
    pub fn link(&mut self, x: f32, y: f32, width: f32, height: f32, link: Link) {
        if self.page == 0 {
            return;
        }
        if let Some(page) = self.pages.get_mut(self.page - 1) {
            page.links.push(LinkArea {
                x,
                y,
                width,
                height,
                link,
            });
        }
    }

    /// Creates a new internal link pointing at the current position.
    pub fn add_link(&mut self) -> LinkId {
        self.links.push(LinkTarget {
            page: self.page,
            y: self.y,
        });
        self.links.len() - 1
    }

    /// Sets the destination of an internal link; `None` uses the current
    /// y position or page.
    pub fn set_link(&mut self, id: LinkId, y: Option<f32>, page: Option<usize>) {
        let (current_y, current_page) = (self.y, self.page);
        if let Some(target) = self.links.get_mut(id) {
            target.y = y.unwrap_or(current_y);
            target.page = page.unwrap_or(current_page);
        }
    }

    pub fn link_target(&self, id: LinkId) -> Option<&LinkTarget> {
        self.links.get(id)
    }

    pub fn links(&self) -> &[LinkTarget] {
        &self.links
    }

    pub(crate) fn links_mut(&mut self) -> &mut [LinkTarget] {
        &mut self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_doc() -> PdfDocument {
        PdfDocument::new(DocumentConfig {
            page_size: PageSize::Custom(110.0, 100.0),
            ..DocumentConfig::default()
        })
    }

    #[test]
    fn config_orientation() {
        let portrait = DocumentConfig::default();
        let landscape = DocumentConfig::landscape();
        assert_eq!(portrait.effective_width(), landscape.effective_height());
        let inches = DocumentConfig {
            unit: Unit::Inch,
            ..DocumentConfig::default()
        };
        assert!((inches.effective_width() - 210.0 / 25.4).abs() < 1e-4);
    }

    #[test]
    fn printable_width_and_trigger() {
        let doc = small_doc();
        assert_eq!(doc.printable_width(), 90.0);
        assert_eq!(doc.page_break_trigger(), 80.0);
        assert!(doc.is_printable_at(10.0, 70.0));
        assert!(!doc.is_printable_at(10.1, 70.0));
    }

    #[test]
    fn state_before_first_page_is_not_recorded() {
        let mut doc = small_doc();
        doc.set_draw_color(Color::RED);
        assert_eq!(doc.page_count(), 0);
        doc.add_page();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages()[0].ops.contains(&DrawOp::SetDrawColor(Color::RED)));
    }

    #[test]
    fn cell_moves_cursor() {
        let mut doc = small_doc();
        doc.add_page();
        doc.cell(20.0, 5.0, "A", Border::None, CellMove::Right, Alignment::Left, false, None);
        assert_eq!(doc.get_x(), 30.0);
        doc.cell(20.0, 5.0, "B", Border::None, CellMove::NextLine, Alignment::Left, false, None);
        assert_eq!((doc.get_x(), doc.get_y()), (10.0, 15.0));
        doc.cell(20.0, 5.0, "C", Border::None, CellMove::Below, Alignment::Left, false, None);
        assert_eq!((doc.get_x(), doc.get_y()), (10.0, 20.0));
    }

    #[test]
    fn cell_triggers_page_break() {
        let mut doc = small_doc();
        doc.add_page();
        doc.set_y(78.0);
        doc.cell(20.0, 5.0, "X", Border::All, CellMove::NextLine, Alignment::Left, false, None);
        assert_eq!(doc.page_no(), 2);
        assert_eq!(doc.get_y(), 15.0);
    }

    #[test]
    fn multi_cell_counts_lines() {
        let mut doc = small_doc();
        doc.add_page();
        let text = "word ".repeat(40);
        let expected = doc.get_lines_count(&text, 30.0);
        let printed = doc.multi_cell(30.0, 5.0, &text, Border::All, Alignment::Left, false);
        assert_eq!(printed, expected);
        assert!(printed > 1);
        assert_eq!(doc.get_lines_count("", 30.0), 1);
    }

    #[test]
    fn wide_glyphs_wrap_earlier() {
        let doc = small_doc();
        // ten W at 9 pt are about 30 mm wide, ten i about 7 mm
        assert_eq!(doc.get_lines_count("WWWWWWWWWW", 20.0), 2);
        assert_eq!(doc.get_lines_count("iiiiiiiiii", 20.0), 1);
        assert!(doc.get_string_width("WWWWWWWWWW") > 29.0);
    }

    #[test]
    fn image_from_memory_uses_natural_size() {
        let img = ::image::RgbImage::new(48, 96);
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, ::image::ImageFormat::Png).unwrap();

        let mut doc = small_doc();
        doc.add_page();
        doc.image_memory(&bytes.into_inner(), 20.0, 30.0, 0.0, 0.0).unwrap();
        let Some(DrawOp::Image {
            source,
            x,
            y,
            width,
            height,
        }) = doc.pages()[0].ops.last()
        else {
            panic!("no image recorded");
        };
        assert!(source.starts_with("data:image/png;base64,"));
        assert_eq!((*x, *y), (20.0, 30.0));
        assert!((width - 12.7).abs() < 1e-3);
        assert!((height - 25.4).abs() < 1e-3);
    }

    #[test]
    fn dashed_line_is_split() {
        let mut doc = small_doc();
        doc.add_page();
        let before = doc.pages()[0].shape_count();
        doc.set_dash_pattern(Some((1.0, 1.0)));
        doc.line(10.0, 10.0, 20.0, 10.0);
        assert_eq!(doc.pages()[0].shape_count() - before, 5);
        doc.set_dash_pattern(None);
        doc.line(10.0, 10.0, 20.0, 10.0);
        assert_eq!(doc.pages()[0].shape_count() - before, 6);
    }

    #[test]
    fn links_are_resolved() {
        let mut doc = small_doc();
        doc.add_page();
        let id = doc.add_link();
        doc.add_page();
        doc.set_link(id, Some(42.0), None);
        assert_eq!(doc.link_target(id), Some(&LinkTarget { page: 2, y: 42.0 }));
    }

    #[test]
    fn missing_image_is_an_error() {
        let mut doc = small_doc();
        doc.add_page();
        let err = doc.image("/no/such/image.png", 0.0, 0.0, 10.0, 10.0, None);
        assert!(matches!(err, Err(PdfError::ImageNotFound(_))));
    }

    #[test]
    fn footer_prints_page_numbers() {
        let mut doc = PdfDocument::new(DocumentConfig {
            page_numbers: true,
            ..DocumentConfig::default()
        });
        doc.add_page();
        doc.add_page();
        doc.close();
        assert!(doc.pages()[0].texts().any(|t| t == "1"));
        assert!(doc.pages()[1].texts().any(|t| t == "2"));
    }
}
