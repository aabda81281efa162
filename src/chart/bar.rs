//! Stacked bar chart.

use std::f32::consts::FRAC_1_SQRT_2;

use crate::border::RectangleStyle;
use crate::chart::SavedState;
use crate::color::Color;
use crate::document::PdfDocument;
use crate::page::Link;
use crate::scale::AxisScale;
use crate::style::LINE_HEIGHT;

/// Horizontal space between two bars.
const BAR_SEPARATOR: f32 = 2.0;

/// One segment of a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarValue {
    pub color: Color,
    pub value: f64,
}

impl BarValue {
    pub fn new(color: Color, value: f64) -> Self {
        Self { color, value }
    }
}

/// One bar: a label under the axis and stacked segments.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub label: String,
    pub values: Vec<BarValue>,
    pub link: Option<Link>,
}

impl BarRow {
    pub fn new(label: impl Into<String>, values: Vec<BarValue>) -> Self {
        Self {
            label: label.into(),
            values,
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<Link>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().map(|v| v.value).sum()
    }
}

/// Y-axis options; missing bounds are computed from the row sums.
#[derive(Default)]
pub struct BarAxis {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub formatter: Option<Box<dyn Fn(f64) -> String>>,
}

impl BarAxis {
    pub fn format(&self, value: f64) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => format_number(value),
        }
    }
}

/// Default tick label: integers without decimals, others with two.
fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// A stacked bar chart; `None` geometry defaults to the left margin, the
/// current y position and the printable width.
pub struct BarChart {
    pub rows: Vec<BarRow>,
    pub axis: BarAxis,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: f32,
}

impl BarChart {
    pub const DEFAULT_HEIGHT: f32 = 80.0;

    pub fn new(rows: Vec<BarRow>) -> Self {
        Self {
            rows,
            axis: BarAxis::default(),
            x: None,
            y: None,
            width: None,
            height: Self::DEFAULT_HEIGHT,
        }
    }

    pub fn with_axis(mut self, axis: BarAxis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self.width = Some(width);
        self.height = height;
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Axis scale from the configured bounds or the row sums.
    pub fn scale(&self) -> AxisScale {
        let sums = self.rows.iter().map(BarRow::sum);
        let min = self
            .axis
            .min
            .unwrap_or_else(|| sums.clone().fold(0.0, f64::min));
        let max = self
            .axis
            .max
            .unwrap_or_else(|| sums.fold(f64::NEG_INFINITY, f64::max).max(min));
        match self.axis.step {
            Some(step) => AxisScale::with_spacing(min, max, step),
            None => AxisScale::new(min, max),
        }
    }

    pub fn draw(&self, doc: &mut PdfDocument) {
        if self.rows.is_empty() {
            log::debug!("bar chart skipped: no rows");
            return;
        }
        let height = self.height;
        if height <= 0.0 {
            return;
        }
        if doc.page_no() == 0 || !doc.is_printable(height) {
            doc.add_page();
        }
        let x = self.x.unwrap_or_else(|| doc.left_margin());
        let y = self.y.unwrap_or_else(|| doc.get_y());
        let width = self.width.unwrap_or_else(|| doc.printable_width());

        let saved = SavedState::save(doc);
        let scale = self.scale();
        let labels: Vec<(f64, String)> = scale.ticks().map(|t| (t, self.axis.format(t))).collect();
        let margin = doc.cell_margin();
        let font_size = doc.font_size();

        // reserve room for the y labels
        let label_width = labels
            .iter()
            .map(|(_, text)| doc.get_string_width(text))
            .fold(0.0, f32::max)
            + 2.0 * margin;
        let left = x + label_width;
        let right = x + width;
        let count = self.rows.len() as f32;
        let bar_width = (right - left - (count + 1.0) * BAR_SEPARATOR) / count;
        if bar_width <= 0.0 {
            log::debug!("bar chart skipped: no room for {} bars", self.rows.len());
            return;
        }

        let x_label_width = self
            .rows
            .iter()
            .map(|row| doc.get_string_width(&row.label))
            .fold(0.0, f32::max);
        let rotate = x_label_width > bar_width;
        let x_labels_height = if rotate {
            x_label_width * FRAC_1_SQRT_2 + font_size
        } else {
            LINE_HEIGHT
        };
        let top = y;
        let bottom = y + height - x_labels_height;
        let chart_height = bottom - top;
        if chart_height <= 0.0 {
            return;
        }
        let range = scale.range();
        let lower = scale.lower_bound();
        let to_y = |value: f64| bottom - ((value - lower) / range) as f32 * chart_height;

        // gridlines and y labels
        doc.set_draw_color(Color::LIGHT_GRAY);
        for (tick, text) in &labels {
            let tick_y = to_y(*tick);
            doc.line(left, tick_y, right, tick_y);
            let text_x = left - margin - doc.get_string_width(text);
            doc.text(text_x, tick_y + 0.3 * font_size, text);
        }

        // x labels
        let bar_x = |index: usize| left + BAR_SEPARATOR + index as f32 * (bar_width + BAR_SEPARATOR);
        for (index, row) in self.rows.iter().enumerate() {
            let center = bar_x(index) + bar_width / 2.0;
            let text_width = doc.get_string_width(&row.label);
            if rotate {
                let offset = text_width * FRAC_1_SQRT_2;
                doc.rotated_text(&row.label, center - offset, bottom + offset + font_size, 45.0);
            } else {
                let text_y = bottom + LINE_HEIGHT / 2.0 + 0.3 * font_size;
                doc.text(center - text_width / 2.0, text_y, &row.label);
            }
        }

        // bars
        let base = lower.max(0.0);
        for (index, row) in self.rows.iter().enumerate() {
            let bx = bar_x(index);
            let mut current = base;
            for segment in &row.values {
                let start = current;
                current += segment.value;
                let y_top = to_y(start.max(current)).max(top);
                let y_bottom = to_y(start.min(current)).min(bottom);
                if y_bottom - y_top <= 0.0 {
                    continue;
                }
                doc.set_fill_color(segment.color);
                doc.rect(bx, y_top, bar_width, y_bottom - y_top, RectangleStyle::Fill);
            }
            if let Some(link) = &row.link {
                doc.link(bx, top, bar_width, chart_height, link.clone());
            }
        }

        // axes
        doc.set_draw_color(Color::BLACK);
        doc.line(left, top, left, bottom);
        let origin = to_y(base).clamp(top, bottom);
        doc.line(left, origin, right, origin);

        saved.restore(doc);
        doc.set_xy(doc.left_margin(), y + height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::DrawOp;

    fn filled_rects(doc: &PdfDocument) -> Vec<(f32, f32, f32, f32)> {
        doc.pages()
            .iter()
            .flat_map(|p| &p.ops)
            .filter_map(|op| match op {
                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    style: RectangleStyle::Fill,
                } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_rows_draw_nothing() {
        let mut doc = PdfDocument::default();
        doc.add_page();
        let before = doc.pages()[0].ops.len();
        BarChart::new(Vec::new()).draw(&mut doc);
        assert_eq!(doc.pages()[0].ops.len(), before);
    }

    #[test]
    fn bars_are_proportional() {
        let mut doc = PdfDocument::default();
        doc.add_page();
        let rows = vec![
            BarRow::new("a", vec![BarValue::new(Color::RED, 50.0)]),
            BarRow::new("b", vec![BarValue::new(Color::RED, 100.0)]),
        ];
        let axis = BarAxis {
            min: Some(0.0),
            max: Some(100.0),
            step: Some(20.0),
            formatter: None,
        };
        BarChart::new(rows).with_axis(axis).draw(&mut doc);
        let bars = filled_rects(&doc);
        assert_eq!(bars.len(), 2);
        assert!((bars[1].3 - 2.0 * bars[0].3).abs() < 1e-3);
        assert!((bars[0].2 - bars[1].2).abs() < 1e-6);
        assert!(bars[0].0 < bars[1].0);
    }

    #[test]
    fn stacked_segments_touch() {
        let mut doc = PdfDocument::default();
        doc.add_page();
        let rows = vec![BarRow::new(
            "q1",
            vec![
                BarValue::new(Color::RED, 10.0),
                BarValue::new(Color::BLUE, 30.0),
            ],
        )];
        BarChart::new(rows).draw(&mut doc);
        let bars = filled_rects(&doc);
        assert_eq!(bars.len(), 2);
        // the second segment sits on top of the first
        assert!((bars[1].1 + bars[1].3 - bars[0].1).abs() < 1e-3);
    }

    #[test]
    fn segments_are_clipped_to_the_axis() {
        let mut doc = PdfDocument::default();
        doc.add_page();
        let y = doc.get_y();
        let rows = vec![BarRow::new("big", vec![BarValue::new(Color::RED, 500.0)])];
        let axis = BarAxis {
            max: Some(100.0),
            step: Some(50.0),
            ..BarAxis::default()
        };
        BarChart::new(rows).with_axis(axis).draw(&mut doc);
        let bars = filled_rects(&doc);
        assert_eq!(bars.len(), 1);
        assert!((bars[0].1 - y).abs() < 1e-4);
    }

    #[test]
    fn long_labels_are_rotated() {
        let mut doc = PdfDocument::default();
        doc.add_page();
        let rows: Vec<BarRow> = (0..30)
            .map(|i| BarRow::new(format!("a rather long label {i}"), vec![BarValue::new(Color::GREEN, 1.0)]))
            .collect();
        BarChart::new(rows).draw(&mut doc);
        assert!(doc.pages()[0]
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Text { angle, .. } if *angle == 45.0)));
    }

    #[test]
    fn formatter_is_used() {
        let axis = BarAxis {
            formatter: Some(Box::new(|v: f64| format!("{v:.1} %"))),
            ..BarAxis::default()
        };
        assert_eq!(axis.format(12.0), "12.0 %");
        assert_eq!(BarAxis::default().format(12.0), "12");
        assert_eq!(BarAxis::default().format(0.5), "0.50");
    }
}
