//! Geometry primitives – rectangles, measurement units and page sizes.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in user units (origin at the top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment test: the right and bottom edges are excluded.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Grows (or shrinks, for negative values) the rectangle on both sides.
    pub fn inflate(self, value: f32) -> Self {
        self.inflate_xy(value, value)
    }

    pub fn inflate_xy(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x - dx,
            y: self.y - dy,
            width: self.width + 2.0 * dx,
            height: self.height + 2.0 * dy,
        }
    }

    /// Moves the left edge to the right, keeping the right edge in place.
    pub fn indent(self, indent: f32) -> Self {
        if indent <= 0.0 {
            return self;
        }
        Self {
            x: self.x + indent,
            width: self.width - indent,
            ..self
        }
    }

    /// Smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Rectangle) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }

    /// Returns whether the two rectangles overlap (edges excluded).
    pub fn intersect(&self, other: &Rectangle) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Measurement unit, expressed by its size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[serde(rename = "pt")]
    Point,
    #[default]
    Mm,
    Cm,
    #[serde(rename = "in")]
    Inch,
}

impl Unit {
    /// Size of one unit in millimetres.
    pub fn mm_factor(self) -> f32 {
        match self {
            Unit::Point => 25.4 / 72.0,
            Unit::Mm => 1.0,
            Unit::Cm => 10.0,
            Unit::Inch => 25.4,
        }
    }

    /// Number of PDF points in one unit.
    pub fn scale_factor(self) -> f32 {
        match self {
            Unit::Point => 1.0,
            Unit::Mm => 72.0 / 25.4,
            Unit::Cm => 72.0 / 2.54,
            Unit::Inch => 72.0,
        }
    }

    /// Factor converting a value expressed in `self` into `target`.
    pub fn ratio_to(self, target: Unit) -> f32 {
        if self == target {
            1.0
        } else {
            self.mm_factor() / target.mm_factor()
        }
    }
}

/// Page orientation; landscape swaps the page width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Standard paper sizes (portrait dimensions).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    /// Width and height in millimetres.
    Custom(f32, f32),
}

impl PageSize {
    /// Portrait width and height in millimetres.
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageSize::A3 => (297.0, 420.0),
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
            PageSize::Custom(w, h) => (w, h),
        }
    }

    /// Parses the paper-size names used by label formats (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a3" => Some(PageSize::A3),
            "a4" => Some(PageSize::A4),
            "a5" => Some(PageSize::A5),
            "letter" => Some(PageSize::Letter),
            "legal" => Some(PageSize::Legal),
            _ => None,
        }
    }
}
