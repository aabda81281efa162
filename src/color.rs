//! RGB colours and their draw / fill / text roles.

use serde::{Deserialize, Serialize};

use crate::document::PdfDocument;

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 128, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const DARK_GRAY: Self = Self::new(169, 169, 169);
    pub const LIGHT_GRAY: Self = Self::new(211, 211, 211);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a colour from unchecked channel values, clamping each to 0–255.
    pub fn clamped(r: i32, g: i32, b: i32) -> Self {
        let clamp = |v: i32| v.clamp(0, 255) as u8;
        Self::new(clamp(r), clamp(g), clamp(b))
    }

    pub fn is_black(&self) -> bool {
        *self == Self::BLACK
    }

    pub fn is_white(&self) -> bool {
        *self == Self::WHITE
    }

    /// Channels as 0.0 – 1.0 floats.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Self::new(r, g, b))
        } else if hex.len() == 3 {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Self::new(r, g, b))
        } else {
            None
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Stroke colour (lines, borders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawColor(pub Color);

/// Fill colour (backgrounds, bars, sectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillColor(pub Color);

/// Text colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextColor(pub Color);

impl DrawColor {
    pub fn apply(&self, doc: &mut PdfDocument) {
        doc.set_draw_color(self.0);
    }

    /// Light gray used for table cell borders.
    pub fn cell_border() -> Self {
        Self(Color::new(221, 221, 221))
    }
}

impl Default for DrawColor {
    fn default() -> Self {
        Self(Color::BLACK)
    }
}

impl FillColor {
    pub fn apply(&self, doc: &mut PdfDocument) {
        doc.set_fill_color(self.0);
    }

    /// Background of table headers.
    pub fn header() -> Self {
        Self(Color::new(245, 245, 245))
    }

    /// True for anything other than the white page background.
    pub fn is_filled(&self) -> bool {
        !self.0.is_white()
    }
}

impl Default for FillColor {
    fn default() -> Self {
        Self(Color::WHITE)
    }
}

impl TextColor {
    pub fn apply(&self, doc: &mut PdfDocument) {
        doc.set_text_color(self.0);
    }

    /// Blue used for clickable text.
    pub fn link() -> Self {
        Self(Color::BLUE)
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self(Color::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#ff8800"), Some(Color::new(255, 136, 0)));
        assert_eq!(Color::from_hex("0f0"), Some(Color::new(0, 255, 0)));
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::new(1, 171, 255).to_hex(), "#01ABFF");
    }

    #[test]
    fn channels_are_clamped() {
        assert_eq!(Color::clamped(-5, 300, 128), Color::new(0, 255, 128));
    }

    #[test]
    fn role_defaults() {
        assert!(DrawColor::default().0.is_black());
        assert!(!FillColor::default().is_filled());
        assert!(FillColor::header().is_filled());
        assert!(TextColor::default().0.is_black());
    }
}
