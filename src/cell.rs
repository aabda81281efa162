//! Table cells and their content variants.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};

use crate::border::{Border, RectangleStyle};
use crate::color::Color;
use crate::document::PdfDocument;
use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::page::Link;
use crate::render;
use crate::style::{Alignment, Style};

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// An image with its pixel size, resizable while keeping its ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCell {
    source: String,
    width: u32,
    height: u32,
    original_width: u32,
    original_height: u32,
}

impl ImageCell {
    /// Loads an image file. Fails if the file does not exist or cannot be
    /// decoded.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PdfError::ImageNotFound(path.to_path_buf()));
        }
        let source = path.to_string_lossy().into_owned();
        let (width, height) = render::image_dimensions(&source)?;
        Ok(Self::with_size(source, width, height))
    }

    /// Wraps PNG or JPEG bytes held in memory.
    pub fn from_memory(data: &[u8]) -> Result<Self> {
        let img = ::image::load_from_memory(data).map_err(|e| PdfError::Image(e.to_string()))?;
        let mime = if data.starts_with(&[0xFF, 0xD8]) {
            "image/jpeg"
        } else {
            "image/png"
        };
        let source = format!("data:{mime};base64,{}", BASE64_STD.encode(data));
        Ok(Self::with_size(source, img.width(), img.height()))
    }

    fn with_size(source: String, width: u32, height: u32) -> Self {
        Self {
            source,
            width,
            height,
            original_width: width,
            original_height: height,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Current size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn original_size(&self) -> (u32, u32) {
        (self.original_width, self.original_height)
    }

    /// Scales the image so its larger side is `size` pixels.
    pub fn resize(mut self, size: u32) -> Self {
        let (w, h) = (self.original_width.max(1), self.original_height.max(1));
        if w >= h {
            self.width = size;
            self.height = ((size as f32 * h as f32 / w as f32).round() as u32).max(1);
        } else {
            self.height = size;
            self.width = ((size as f32 * w as f32 / h as f32).round() as u32).max(1);
        }
        self
    }

    /// Size in user units.
    pub fn user_size(&self, doc: &PdfDocument) -> (f32, f32) {
        (
            doc.pixels_to_user_unit(self.width as f32),
            doc.pixels_to_user_unit(self.height as f32),
        )
    }

    /// Draws the image inside `bounds` (inset by the cell margin),
    /// horizontally aligned.
    pub fn draw(
        &self,
        doc: &mut PdfDocument,
        bounds: &Rectangle,
        alignment: Alignment,
        link: Option<Link>,
    ) -> Result<()> {
        let margin = doc.cell_margin();
        let (width, height) = self.user_size(doc);
        let x = match alignment {
            Alignment::Center => bounds.x + (bounds.width - width) / 2.0,
            Alignment::Right => bounds.right() - margin - width,
            Alignment::Left | Alignment::Justify => bounds.x + margin,
        };
        doc.image(&self.source, x, bounds.y + margin, width, height, link)
    }
}

/// A small bitmap icon followed by text.
#[derive(Debug, Clone, PartialEq)]
pub struct IconCell {
    pub icon: ImageCell,
    pub text: String,
}

impl IconCell {
    pub fn new(icon: ImageCell, text: impl Into<String>) -> Self {
        Self {
            icon,
            text: text.into(),
        }
    }

    /// Icon resized to fit a text line of `line_height` user units.
    fn fitted(&self, doc: &PdfDocument, line_height: f32) -> ImageCell {
        let pixels = (line_height * doc.scale_factor() * 96.0 / 72.0).floor() as u32;
        self.icon.clone().resize(pixels.max(1))
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// What a cell prints.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellContent {
    #[default]
    Text,
    Image(ImageCell),
    Icon(IconCell),
}

/// One slot of a table row, optionally spanning several columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: Option<String>,
    pub cols: usize,
    pub style: Option<Style>,
    pub alignment: Option<Alignment>,
    pub border: Option<Border>,
    pub link: Option<Link>,
    pub content: CellContent,
    /// Extra fill painted before the regular background.
    pub background: Option<Color>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            text: None,
            cols: 1,
            style: None,
            alignment: None,
            border: None,
            link: None,
            content: CellContent::Text,
            background: None,
        }
    }
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn image(image: ImageCell) -> Self {
        Self {
            content: CellContent::Image(image),
            ..Self::default()
        }
    }

    pub fn icon(icon: IconCell) -> Self {
        Self {
            text: Some(icon.text.clone()),
            content: CellContent::Icon(icon),
            ..Self::default()
        }
    }

    /// Number of spanned columns, at least 1.
    pub fn with_cols(mut self, cols: usize) -> Self {
        self.cols = cols.max(1);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_link(mut self, link: impl Into<Link>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn is_image(&self) -> bool {
        matches!(self.content, CellContent::Image(_))
    }

    /// Height needed to print this cell in a column of `width`.
    pub fn height(&self, doc: &PdfDocument, width: f32, line_height: f32) -> f32 {
        match &self.content {
            CellContent::Text => doc.get_lines_count(self.text(), width) as f32 * line_height,
            CellContent::Image(image) => image.user_size(doc).1 + 2.0 * doc.cell_margin(),
            CellContent::Icon(icon) => {
                let (icon_width, _) = icon.fitted(doc, line_height).user_size(doc);
                let text_width = width - icon_width - doc.cell_margin();
                doc.get_lines_count(&icon.text, text_width) as f32 * line_height
            }
        }
    }

    /// Prints the content of the cell inside `bounds` and returns the
    /// number of text lines printed.
    pub fn draw_content(
        &self,
        doc: &mut PdfDocument,
        bounds: &Rectangle,
        alignment: Alignment,
        line_height: f32,
    ) -> Result<usize> {
        if let Some(color) = self.background {
            let fill = doc.fill_color();
            doc.set_fill_color(color);
            doc.rectangle(bounds, RectangleStyle::Fill);
            doc.set_fill_color(fill);
        }
        match &self.content {
            CellContent::Text => {
                doc.set_xy(bounds.x, bounds.y);
                Ok(doc.multi_cell(
                    bounds.width,
                    line_height,
                    self.text(),
                    Border::None,
                    alignment,
                    false,
                ))
            }
            CellContent::Image(image) => {
                image.draw(doc, bounds, alignment, None)?;
                Ok(0)
            }
            CellContent::Icon(icon) => {
                let fitted = icon.fitted(doc, line_height);
                let (icon_width, icon_height) = fitted.user_size(doc);
                let margin = doc.cell_margin();
                doc.image(
                    fitted.source(),
                    bounds.x + margin,
                    bounds.y + (line_height - icon_height) / 2.0,
                    icon_width,
                    icon_height,
                    None,
                )?;
                let text_bounds = bounds.indent(icon_width + margin);
                doc.set_xy(text_bounds.x, text_bounds.y);
                Ok(doc.multi_cell(
                    text_bounds.width,
                    line_height,
                    &icon.text,
                    Border::None,
                    alignment,
                    false,
                ))
            }
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::new(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ::image::RgbImage::new(width, height);
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, ::image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn missing_image_file() {
        let err = ImageCell::new("/no/such/picture.png").unwrap_err();
        assert!(matches!(err, PdfError::ImageNotFound(_)));
    }

    #[test]
    fn resize_keeps_ratio() {
        let image = ImageCell::from_memory(&png_bytes(200, 100)).unwrap();
        assert_eq!(image.size(), (200, 100));
        let small = image.resize(50);
        assert_eq!(small.size(), (50, 25));
        assert_eq!(small.original_size(), (200, 100));
    }

    #[test]
    fn cols_are_at_least_one() {
        assert_eq!(Cell::new("a").with_cols(0).cols, 1);
        assert_eq!(Cell::new("a").with_cols(3).cols, 3);
        assert_eq!(Cell::empty().text(), "");
    }

    #[test]
    fn image_height_includes_margins() {
        let doc = PdfDocument::default();
        let cell = Cell::image(ImageCell::from_memory(&png_bytes(96, 96)).unwrap());
        // 96 px at 96 dpi is one inch
        let expected = 25.4 + 2.0 * doc.cell_margin();
        assert!((cell.height(&doc, 50.0, 5.0) - expected).abs() < 1e-3);
    }

    #[test]
    fn text_height_counts_lines() {
        let doc = PdfDocument::default();
        let cell = Cell::new("one two three four five six seven eight nine ten");
        let lines = doc.get_lines_count(cell.text(), 20.0);
        assert!(lines > 1);
        assert_eq!(cell.height(&doc, 20.0, 5.0), lines as f32 * 5.0);
    }
}
