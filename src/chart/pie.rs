//! Pie chart.

use crate::border::RectangleStyle;
use crate::chart::SavedState;
use crate::color::Color;
use crate::document::PdfDocument;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieValue {
    pub color: Color,
    pub value: f64,
}

impl PieValue {
    pub fn new(color: Color, value: f64) -> Self {
        Self { color, value }
    }
}

/// A pie chart. Without an explicit center the chart is placed at the
/// left margin below the current position.
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub rows: Vec<PieValue>,
    pub radius: f32,
    pub center: Option<(f32, f32)>,
    pub clockwise: bool,
    /// Angle, in degrees, where the first sector starts (90 = top).
    pub origin: f32,
    pub style: RectangleStyle,
}

impl PieChart {
    pub fn new(rows: Vec<PieValue>, radius: f32) -> Self {
        Self {
            rows,
            radius,
            center: None,
            clockwise: true,
            origin: 90.0,
            style: RectangleStyle::Both,
        }
    }

    pub fn with_center(mut self, x: f32, y: f32) -> Self {
        self.center = Some((x, y));
        self
    }

    pub fn with_direction(mut self, clockwise: bool, origin: f32) -> Self {
        self.clockwise = clockwise;
        self.origin = origin;
        self
    }

    pub fn with_style(mut self, style: RectangleStyle) -> Self {
        self.style = style;
        self
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.value).sum()
    }

    pub fn draw(&self, doc: &mut PdfDocument) {
        let total = self.total();
        if self.radius <= 0.0 || self.rows.is_empty() || total.abs() < 1e-9 {
            log::debug!("pie chart skipped: nothing to draw");
            return;
        }

        let diameter = 2.0 * self.radius;
        let (xc, yc) = match self.center {
            Some(center) => center,
            None => {
                if doc.page_no() == 0 || !doc.is_printable(diameter) {
                    doc.add_page();
                }
                (doc.left_margin() + self.radius, doc.get_y() + self.radius)
            }
        };

        let saved = SavedState::save(doc);
        let mut start = 0.0;
        for row in &self.rows {
            let sweep = (row.value / total * 360.0) as f32;
            if sweep.abs() <= f32::EPSILON {
                continue;
            }
            doc.set_fill_color(row.color);
            doc.sector(
                xc,
                yc,
                self.radius,
                start,
                start + sweep,
                self.style,
                self.clockwise,
                self.origin,
            );
            start += sweep;
        }
        saved.restore(doc);

        if self.center.is_none() {
            doc.set_xy(doc.left_margin(), yc + self.radius);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::DrawOp;

    fn polygons(doc: &PdfDocument) -> Vec<Vec<(f32, f32)>> {
        doc.pages()[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Polygon { points, .. } => Some(points.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn zero_total_draws_nothing() {
        let mut doc = PdfDocument::default();
        doc.add_page();
        let before = doc.pages()[0].ops.len();
        let rows = vec![PieValue::new(Color::RED, 0.0), PieValue::new(Color::BLUE, 0.0)];
        PieChart::new(rows, 20.0).draw(&mut doc);
        assert_eq!(doc.pages()[0].ops.len(), before);
    }

    #[test]
    fn non_positive_radius_draws_nothing() {
        let mut doc = PdfDocument::default();
        doc.add_page();
        let before = doc.pages()[0].ops.len();
        PieChart::new(vec![PieValue::new(Color::RED, 3.0)], 0.0).draw(&mut doc);
        PieChart::new(Vec::new(), 10.0).draw(&mut doc);
        assert_eq!(doc.pages()[0].ops.len(), before);
    }

    #[test]
    fn sectors_follow_shares() {
        let mut doc = PdfDocument::default();
        doc.add_page();
        let rows = vec![PieValue::new(Color::RED, 1.0), PieValue::new(Color::BLUE, 3.0)];
        PieChart::new(rows, 20.0).with_center(100.0, 100.0).draw(&mut doc);
        let sectors = polygons(&doc);
        assert_eq!(sectors.len(), 2);
        // 90 degrees in 5 degree steps: center plus 19 arc points
        assert_eq!(sectors[0].len(), 20);
        assert_eq!(sectors[1].len(), 56);
        // clockwise from the top: the first sector ends at 3 o'clock
        let (x, y) = sectors[0][sectors[0].len() - 1];
        assert!((x - 120.0).abs() < 1e-3 && (y - 100.0).abs() < 1e-3);
    }
}
