//! Label sheets (Avery formats).
//!
//! A format describes a grid of same-sized labels on a sheet: number of
//! columns and rows, label size, sheet margins and the spacing between
//! labels. [`LabelDocument`] prints one text block per label, filling the
//! sheet row by row.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::border::{Border, RectangleStyle};
use crate::document::{DocumentConfig, PdfDocument};
use crate::error::{PdfError, Result};
use crate::geometry::{PageSize, Unit};
use crate::style::{Alignment, Font, FontName, FontStyle};

/// Formats shipped with the crate.
const BUILTIN_FORMATS: &str = include_str!("../resources/avery.json");

/// Horizontal padding between a label edge and its text, in millimetres.
const PADDING: f32 = 3.0;

/// Dash pattern of the optional label border, in millimetres.
const BORDER_DASH: (f32, f32) = (1.0, 1.0);

/// Line height, in millimetres, for each supported font size.
const LINE_HEIGHTS: [(f32, f32); 10] = [
    (6.0, 2.0),
    (7.0, 2.5),
    (8.0, 3.0),
    (9.0, 4.0),
    (10.0, 5.0),
    (11.0, 6.0),
    (12.0, 7.0),
    (13.0, 8.0),
    (14.0, 9.0),
    (15.0, 10.0),
];

/// Line height, in millimetres, of a label font size.
pub fn label_line_height(font_size: f32) -> Result<f32> {
    LINE_HEIGHTS
        .iter()
        .find(|(size, _)| (size - font_size).abs() < f32::EPSILON)
        .map(|(_, height)| *height)
        .ok_or(PdfError::UnsupportedFontSize(font_size))
}

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// A label sheet layout. Linear fields are expressed in `unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveryFormat {
    pub name: String,
    pub page_size: PageSize,
    pub unit: Unit,
    pub margin_left: f32,
    pub margin_top: f32,
    pub cols: usize,
    pub rows: usize,
    pub space_x: f32,
    pub space_y: f32,
    pub width: f32,
    pub height: f32,
    /// Font size in points.
    pub font_size: f32,
}

impl AveryFormat {
    /// Formats embedded in the crate.
    pub fn builtin() -> Result<Vec<AveryFormat>> {
        Ok(serde_json::from_str(BUILTIN_FORMATS)?)
    }

    /// Reads a JSON array of formats.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<AveryFormat>> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let formats: Vec<AveryFormat> = serde_json::from_str(&json)?;
        log::debug!("{} label formats loaded from {}", formats.len(), path.display());
        Ok(formats)
    }

    /// Looks a built-in format up by name (case-insensitive).
    pub fn find(name: &str) -> Result<AveryFormat> {
        Self::find_in(&Self::builtin()?, name)
    }

    pub fn find_in(formats: &[AveryFormat], name: &str) -> Result<AveryFormat> {
        formats
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| PdfError::UnknownLabelFormat(name.to_string()))
    }

    /// Returns the format expressed in `unit`. The format itself is
    /// returned when it already uses that unit.
    pub fn convert(&self, unit: Unit) -> Cow<'_, AveryFormat> {
        if self.unit == unit {
            return Cow::Borrowed(self);
        }
        let ratio = self.unit.ratio_to(unit);
        Cow::Owned(AveryFormat {
            unit,
            margin_left: self.margin_left * ratio,
            margin_top: self.margin_top * ratio,
            space_x: self.space_x * ratio,
            space_y: self.space_y * ratio,
            width: self.width * ratio,
            height: self.height * ratio,
            ..self.clone()
        })
    }

    pub fn labels_per_page(&self) -> usize {
        self.cols * self.rows
    }

    pub fn offset_x(&self, col: usize) -> f32 {
        self.margin_left + col as f32 * (self.width + self.space_x)
    }

    pub fn offset_y(&self, row: usize) -> f32 {
        self.margin_top + row as f32 * (self.height + self.space_y)
    }

    /// Page offset of the label at a zero-based index on its sheet.
    pub fn offset(&self, index: usize) -> (f32, f32) {
        let cols = self.cols.max(1);
        let index = index % self.labels_per_page().max(1);
        (self.offset_x(index % cols), self.offset_y(index / cols))
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A document printing one text block per label.
pub struct LabelDocument {
    doc: PdfDocument,
    format: AveryFormat,
    line_height: f32,
    border: bool,
    count: usize,
}

impl LabelDocument {
    pub fn new(format: &AveryFormat) -> Result<Self> {
        if format.cols == 0 || format.rows == 0 {
            return Err(PdfError::EmptyLabelGrid {
                name: format.name.clone(),
                cols: format.cols,
                rows: format.rows,
            });
        }
        let line_height = label_line_height(format.font_size)?;
        let format = format.convert(Unit::Mm).into_owned();
        let config = DocumentConfig {
            title: format!("Labels {}", format.name),
            page_size: format.page_size,
            unit: Unit::Mm,
            left_margin: 0.0,
            top_margin: 0.0,
            right_margin: 0.0,
            bottom_margin: 0.0,
            cell_margin: 0.0,
            font: Font::new(FontName::Helvetica, FontStyle::empty(), format.font_size),
            auto_page_break: false,
            ..DocumentConfig::default()
        };
        Ok(Self {
            doc: PdfDocument::new(config),
            format,
            line_height,
            border: false,
            count: 0,
        })
    }

    /// Opens a document for a built-in format.
    pub fn named(name: &str) -> Result<Self> {
        Self::new(&AveryFormat::find(name)?)
    }

    /// Draws a dashed border around every label.
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// The format, in millimetres.
    pub fn format(&self) -> &AveryFormat {
        &self.format
    }

    pub fn label_count(&self) -> usize {
        self.count
    }

    /// Prints the next label, starting a new sheet when the current one is
    /// full. The text is vertically centred in the label.
    pub fn add_label(&mut self, text: &str) {
        let index = self.count % self.format.labels_per_page();
        if index == 0 {
            self.doc.add_page();
        }
        self.count += 1;

        let (x, y) = self.format.offset(index);
        let (width, height) = (self.format.width, self.format.height);
        if self.border {
            self.doc.set_dash_pattern(Some(BORDER_DASH));
            self.doc.rect(x, y, width, height, RectangleStyle::Draw);
            self.doc.set_dash_pattern(None);
        }

        let text_width = width - 2.0 * PADDING;
        let lines = self.doc.get_lines_count(text, text_width);
        let top = y + (height - lines as f32 * self.line_height) / 2.0;
        self.doc.set_xy(x + PADDING, top);
        self.doc
            .multi_cell(text_width, self.line_height, text, Border::None, Alignment::Left, false);
    }

    pub fn document(&self) -> &PdfDocument {
        &self.doc
    }

    pub fn into_document(self) -> PdfDocument {
        self.doc
    }

    pub fn output(&mut self) -> Result<Vec<u8>> {
        log::debug!("{} labels on {} sheets", self.count, self.doc.page_count());
        self.doc.output()
    }
}
