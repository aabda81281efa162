//! Font metrics and text measurement using `ttf-parser`.
//!
//! The standard PDF fonts are measured with their AFM glyph widths; a TTF
//! face may be registered for a family to get exact advances instead.

use std::collections::HashMap;

use crate::error::{PdfError, Result};
use crate::style::{Font, FontName};

/// A loaded font face with metrics.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
    pub ascender: f32,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: FontName,
    pub bold: bool,
    pub italic: bool,
}

impl From<&Font> for FontKey {
    fn from(font: &Font) -> Self {
        Self {
            family: font.name,
            bold: font.is_bold(),
            italic: font.is_italic(),
        }
    }
}

/// Manages font metrics overrides.
#[derive(Clone, Default)]
pub struct FontManager {
    fonts: HashMap<FontKey, FontData>,
}

impl FontManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers TTF/OTF metrics for a family and style.
    pub fn load_font(&mut self, key: FontKey, bytes: Vec<u8>) -> Result<()> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| PdfError::Font(format!("failed to parse font: {e}")))?;

        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender() as f32,
            bytes,
        };
        log::debug!("loaded metrics for {:?}", key);
        self.fonts.insert(key, data);
        Ok(())
    }

    pub fn has_metrics(&self, key: &FontKey) -> bool {
        self.fonts.contains_key(key)
    }

    /// Measure the width of a string in points.
    pub fn measure_text_width(&self, text: &str, font: &Font) -> f32 {
        let key = FontKey::from(font);
        let font_size = font.size;

        let Some(data) = self.fonts.get(&key) else {
            let widths = Base14Widths::for_key(&key);
            let units: f32 = text.chars().map(|ch| widths.char_width(ch)).sum();
            return units * font_size / 1000.0;
        };

        // Parse the font and sum horizontal advances
        if let Ok(face) = ttf_parser::Face::parse(&data.bytes, 0) {
            let scale = font_size / data.units_per_em;
            text.chars()
                .map(|ch| match face.glyph_index(ch) {
                    Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                    // Fallback for missing glyph
                    None => font_size * 0.5,
                })
                .sum()
        } else {
            text.chars().count() as f32 * font_size * 0.5
        }
    }

    /// Ascender in points, 0.75 em for the standard fonts.
    pub fn ascender(&self, font: &Font) -> f32 {
        match self.fonts.get(&FontKey::from(font)) {
            Some(data) => data.ascender * font.size / data.units_per_em,
            None => font.size * 0.75,
        }
    }
}

/// Glyph widths of the standard fonts in 1/1000 em.
#[derive(Debug, Clone, Copy)]
enum Base14Widths {
    /// Widths of the printable ASCII range, space to tilde.
    Proportional(&'static [u16; 95]),
    Monospace(u16),
    Symbol,
}

impl Base14Widths {
    /// Oblique and italic faces share the upright widths.
    fn for_key(key: &FontKey) -> Self {
        match (key.family, key.bold) {
            (FontName::Helvetica, false) => Self::Proportional(&HELVETICA),
            (FontName::Helvetica, true) => Self::Proportional(&HELVETICA_BOLD),
            (FontName::Times, false) => Self::Proportional(&TIMES_ROMAN),
            (FontName::Times, true) => Self::Proportional(&TIMES_BOLD),
            (FontName::Courier, _) => Self::Monospace(600),
            (FontName::Symbol | FontName::ZapfDingbats, _) => Self::Symbol,
        }
    }

    fn char_width(self, ch: char) -> f32 {
        match self {
            Self::Proportional(widths) => {
                let code = ch as usize;
                match code.checked_sub(0x20).and_then(|i| widths.get(i)) {
                    Some(width) => f32::from(*width),
                    // Default for characters outside ASCII
                    None => 556.0,
                }
            }
            Self::Monospace(width) => f32::from(width),
            Self::Symbol => 500.0,
        }
    }
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

/// Word-wrap text to fit within `max_width`; `measure` returns the width of
/// a candidate line. Words longer than a line are broken by character.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    // Split on existing newlines first
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            if measure(&candidate) <= max_width {
                current_line = candidate;
                continue;
            }
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            if measure(word) <= max_width {
                current_line = word.to_string();
            } else {
                // Break the word itself
                for ch in word.chars() {
                    current_line.push(ch);
                    if measure(&current_line) > max_width && current_line.chars().count() > 1 {
                        current_line.pop();
                        lines.push(std::mem::take(&mut current_line));
                        current_line.push(ch);
                    }
                }
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_font_widths() {
        let mgr = FontManager::default();
        let w = mgr.measure_text_width("Hello", &Font::default().with_size(10.0));
        // H 722 + e 556 + l 222 + l 222 + o 556
        assert!((w - 22.78).abs() < 1e-3);
        let courier = Font::default().with_name(FontName::Courier).with_size(10.0);
        assert!((mgr.measure_text_width("abcd", &courier) - 24.0).abs() < 0.1);
        let bold = mgr.measure_text_width("Hello", &Font::default().bold().with_size(10.0));
        assert!(bold > w);
    }

    #[test]
    fn glyph_widths_differ() {
        let mgr = FontManager::default();
        let font = Font::default();
        let narrow = mgr.measure_text_width(&"i".repeat(10), &font);
        let wide = mgr.measure_text_width(&"W".repeat(10), &font);
        assert!((wide - 84.96).abs() < 1e-3);
        assert!(wide > 4.0 * narrow);
    }

    #[test]
    fn width_tables_cover_printable_ascii() {
        for table in [&HELVETICA, &HELVETICA_BOLD, &TIMES_ROMAN, &TIMES_BOLD] {
            assert_eq!(table[usize::from(b'0' - 0x20)], table[usize::from(b'9' - 0x20)]);
            assert!(table.iter().all(|w| (180..=1015).contains(w)));
        }
        assert_eq!(HELVETICA[usize::from(b'W' - 0x20)], 944);
        assert_eq!(TIMES_ROMAN[usize::from(b'a' - 0x20)], 444);
    }

    #[test]
    fn word_wrap_basic() {
        let lines = wrap_text("Hello world foo bar", 60.0, |s| s.chars().count() as f32 * 8.0);
        assert_eq!(lines, vec!["Hello", "world", "foo bar"]);
    }

    #[test]
    fn long_words_are_broken() {
        let lines = wrap_text("abcdefghij", 40.0, |s| s.chars().count() as f32 * 10.0);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn explicit_newlines_are_kept() {
        let lines = wrap_text("one\n\ntwo", 100.0, |s| s.len() as f32);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let mut mgr = FontManager::new();
        let key = FontKey {
            family: FontName::Helvetica,
            bold: false,
            italic: false,
        };
        assert!(mgr.load_font(key, vec![0, 1, 2]).is_err());
        assert!(!mgr.has_metrics(&key));
    }
}
