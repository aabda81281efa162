//! Typed style value objects – font, line width and the aggregate cell
//! [`Style`] consumed by tables, charts and index pages.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::border::Border;
use crate::color::{DrawColor, FillColor, TextColor};
use crate::document::PdfDocument;

/// Default line height in millimetres for the default font size.
pub const LINE_HEIGHT: f32 = 5.0;

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

// ---------------------------------------------------------------------------
// Font
// ---------------------------------------------------------------------------

/// The standard PDF font families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontName {
    Courier,
    #[default]
    Helvetica,
    Symbol,
    Times,
    ZapfDingbats,
}

impl FontName {
    /// Resolves a family name, treating `Arial` as Helvetica.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "courier" => Some(FontName::Courier),
            "helvetica" | "arial" => Some(FontName::Helvetica),
            "symbol" => Some(FontName::Symbol),
            "times" => Some(FontName::Times),
            "zapfdingbats" => Some(FontName::ZapfDingbats),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontName::Courier => "Courier",
            FontName::Helvetica => "Helvetica",
            FontName::Symbol => "Symbol",
            FontName::Times => "Times",
            FontName::ZapfDingbats => "ZapfDingbats",
        }
    }
}

bitflags! {
    /// Font style flags, encoded as `"BIU"` letters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FontStyle: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
    }
}

impl FontStyle {
    /// Parses a style string such as `"BI"` (case-insensitive, unknown
    /// letters ignored).
    pub fn parse(value: &str) -> Self {
        value.chars().fold(FontStyle::empty(), |style, ch| {
            style
                | match ch.to_ascii_uppercase() {
                    'B' => FontStyle::BOLD,
                    'I' => FontStyle::ITALIC,
                    'U' => FontStyle::UNDERLINE,
                    _ => FontStyle::empty(),
                }
        })
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(FontStyle::BOLD) {
            f.write_str("B")?;
        }
        if self.contains(FontStyle::ITALIC) {
            f.write_str("I")?;
        }
        if self.contains(FontStyle::UNDERLINE) {
            f.write_str("U")?;
        }
        Ok(())
    }
}

/// A font: family, style and size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub name: FontName,
    pub style: FontStyle,
    pub size: f32,
}

impl Font {
    pub const DEFAULT_SIZE: f32 = 9.0;

    pub fn new(name: FontName, style: FontStyle, size: f32) -> Self {
        Self { name, style, size }
    }

    /// Adds the given flags to the current style.
    pub fn add_style(mut self, style: FontStyle) -> Self {
        self.style |= style;
        self
    }

    /// Replaces the current style.
    pub fn set_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_name(mut self, name: FontName) -> Self {
        self.name = name;
        self
    }

    pub fn bold(self) -> Self {
        self.add_style(FontStyle::BOLD)
    }

    pub fn italic(self) -> Self {
        self.add_style(FontStyle::ITALIC)
    }

    pub fn underline(self) -> Self {
        self.add_style(FontStyle::UNDERLINE)
    }

    pub fn regular(self) -> Self {
        self.set_style(FontStyle::empty())
    }

    pub fn is_bold(&self) -> bool {
        self.style.contains(FontStyle::BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.style.contains(FontStyle::ITALIC)
    }

    pub fn is_underline(&self) -> bool {
        self.style.contains(FontStyle::UNDERLINE)
    }

    pub fn is_default_size(&self) -> bool {
        (self.size - Self::DEFAULT_SIZE).abs() < f32::EPSILON
    }

    /// Line height in millimetres, proportional to the default line height.
    pub fn line_height(&self) -> f32 {
        if self.is_default_size() {
            LINE_HEIGHT
        } else {
            LINE_HEIGHT * self.size / Self::DEFAULT_SIZE
        }
    }

    pub fn apply(&self, doc: &mut PdfDocument) {
        doc.set_font(*self);
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(FontName::Helvetica, FontStyle::empty(), Self::DEFAULT_SIZE)
    }
}

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// Stroke width in user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub width: f32,
}

impl Line {
    pub const DEFAULT_WIDTH: f32 = 0.2;

    pub fn new(width: f32) -> Self {
        Self {
            width: width.max(0.0),
        }
    }

    pub fn apply(&self, doc: &mut PdfDocument) {
        doc.set_line_width(self.width);
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH)
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Aggregate cell style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub font: Font,
    pub draw_color: DrawColor,
    pub fill_color: FillColor,
    pub text_color: TextColor,
    pub line: Line,
    pub border: Border,
    /// Left indent of the cell content in user units.
    pub indent: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font: Font::default(),
            draw_color: DrawColor::default(),
            fill_color: FillColor::default(),
            text_color: TextColor::default(),
            line: Line::default(),
            border: Border::All,
            indent: 0.0,
        }
    }
}

impl Style {
    /// Regular table cell: light gray borders.
    pub fn cell() -> Self {
        Self::default().with_draw_color(DrawColor::cell_border())
    }

    /// Table header: bold font over a light background.
    pub fn header() -> Self {
        Self::cell()
            .with_font(Font::default().bold())
            .with_fill_color(FillColor::header())
    }

    /// Totals row, rendered like a header.
    pub fn total() -> Self {
        Self::header()
    }

    pub fn bold() -> Self {
        Self::cell().with_font(Font::default().bold())
    }

    pub fn italic() -> Self {
        Self::cell().with_font(Font::default().italic())
    }

    pub fn bold_italic() -> Self {
        Self::cell().with_font(Font::default().bold().italic())
    }

    /// Clickable text: blue, no border.
    pub fn link() -> Self {
        Self::no_border().with_text_color(TextColor::link())
    }

    pub fn no_border() -> Self {
        Self::default().with_border(Border::None)
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn with_draw_color(mut self, color: DrawColor) -> Self {
        self.draw_color = color;
        self
    }

    pub fn with_fill_color(mut self, color: FillColor) -> Self {
        self.fill_color = color;
        self
    }

    pub fn with_text_color(mut self, color: TextColor) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.line = line;
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub fn with_indent(mut self, indent: f32) -> Self {
        self.indent = indent.max(0.0);
        self
    }

    pub fn is_fill_color(&self) -> bool {
        self.fill_color.is_filled()
    }

    /// Pushes every property to the document: font, line, draw, fill, text.
    pub fn apply(&self, doc: &mut PdfDocument) {
        self.font.apply(doc);
        self.line.apply(doc);
        self.draw_color.apply(doc);
        self.fill_color.apply(doc);
        self.text_color.apply(doc);
    }

    pub fn line_height(&self) -> f32 {
        self.font.line_height()
    }
}
