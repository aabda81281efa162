//! Chart legends: a coloured disc followed by a label per entry.

use crate::border::RectangleStyle;
use crate::chart::SavedState;
use crate::color::Color;
use crate::document::PdfDocument;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub color: Color,
    pub label: String,
}

impl LegendEntry {
    pub fn new(color: Color, label: impl Into<String>) -> Self {
        Self {
            color,
            label: label.into(),
        }
    }
}

fn disc_radius(doc: &PdfDocument) -> f32 {
    doc.font_size() * 0.3
}

/// Width of one entry: disc, margins and label.
pub fn legend_width(doc: &PdfDocument, entry: &LegendEntry) -> f32 {
    2.0 * disc_radius(doc) + 3.0 * doc.cell_margin() + doc.get_string_width(&entry.label)
}

fn draw_entry(doc: &mut PdfDocument, entry: &LegendEntry, x: f32, y: f32, height: f32) {
    let radius = disc_radius(doc);
    let margin = doc.cell_margin();
    doc.set_fill_color(entry.color);
    doc.circle(x + margin + radius, y + height / 2.0, radius, RectangleStyle::Fill);
    let text_x = x + 2.0 * margin + 2.0 * radius;
    let baseline = y + height / 2.0 + 0.3 * doc.font_size();
    doc.text(text_x, baseline, &entry.label);
}

/// Draws the entries on one line. Without `x` the line is centred in the
/// printable width.
pub fn legends_horizontal(doc: &mut PdfDocument, entries: &[LegendEntry], x: Option<f32>) {
    if entries.is_empty() {
        return;
    }
    let height = doc.font().line_height();
    if doc.page_no() == 0 || !doc.is_printable(height) {
        doc.add_page();
    }
    let widths: Vec<f32> = entries.iter().map(|e| legend_width(doc, e)).collect();
    let total: f32 = widths.iter().sum();
    let mut x =
        x.unwrap_or_else(|| doc.left_margin() + ((doc.printable_width() - total) / 2.0).max(0.0));
    let y = doc.get_y();

    let saved = SavedState::save(doc);
    for (entry, width) in entries.iter().zip(widths) {
        draw_entry(doc, entry, x, y, height);
        x += width;
    }
    saved.restore(doc);
    doc.set_xy(doc.left_margin(), y + height);
}

/// Draws one entry per line.
pub fn legends_vertical(doc: &mut PdfDocument, entries: &[LegendEntry], x: Option<f32>) {
    if entries.is_empty() {
        return;
    }
    let height = doc.font().line_height();
    let x = x.unwrap_or_else(|| doc.left_margin());

    let saved = SavedState::save(doc);
    for entry in entries {
        if doc.page_no() == 0 || !doc.is_printable(height) {
            doc.add_page();
        }
        let y = doc.get_y();
        draw_entry(doc, entry, x, y, height);
        doc.set_y(y + height);
    }
    saved.restore(doc);
    doc.set_x(doc.left_margin());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::DrawOp;

    fn text_positions(doc: &PdfDocument) -> Vec<(f32, f32)> {
        doc.pages()[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn horizontal_legend_is_centred() {
        let mut doc = PdfDocument::default();
        doc.add_page();
        let entries = vec![LegendEntry::new(Color::RED, "Sales")];
        let width = legend_width(&doc, &entries[0]);
        legends_horizontal(&mut doc, &entries, None);
        let (x, _) = text_positions(&doc)[0];
        let start = doc.left_margin() + (doc.printable_width() - width) / 2.0;
        let expected = start + 2.0 * doc.cell_margin() + 2.0 * disc_radius(&doc);
        assert!((x - expected).abs() < 1e-4);
    }

    #[test]
    fn vertical_legend_stacks_entries() {
        let mut doc = PdfDocument::default();
        doc.add_page();
        let entries = vec![
            LegendEntry::new(Color::RED, "One"),
            LegendEntry::new(Color::GREEN, "Two"),
        ];
        let y = doc.get_y();
        legends_vertical(&mut doc, &entries, Some(20.0));
        let positions = text_positions(&doc);
        assert_eq!(positions.len(), 2);
        assert!((positions[1].1 - positions[0].1 - 5.0).abs() < 1e-4);
        assert!((doc.get_y() - (y + 10.0)).abs() < 1e-4);
    }
}
