//! Bar and pie charts with their legends.
//!
//! Charts draw directly on a [`PdfDocument`] and leave its graphic state
//! as they found it.

pub mod bar;
pub mod legend;
pub mod pie;

pub use bar::{BarAxis, BarChart, BarRow, BarValue};
pub use legend::{legends_horizontal, legends_vertical, LegendEntry};
pub use pie::{PieChart, PieValue};

use crate::color::Color;
use crate::document::PdfDocument;
use crate::style::Font;

/// Graphic state saved before drawing a chart.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SavedState {
    font: Font,
    draw: Color,
    fill: Color,
    text: Color,
    line_width: f32,
}

impl SavedState {
    pub(crate) fn save(doc: &PdfDocument) -> Self {
        Self {
            font: doc.font(),
            draw: doc.draw_color(),
            fill: doc.fill_color(),
            text: doc.text_color(),
            line_width: doc.line_width(),
        }
    }

    pub(crate) fn restore(self, doc: &mut PdfDocument) {
        doc.set_font(self.font);
        if doc.draw_color() != self.draw {
            doc.set_draw_color(self.draw);
        }
        if doc.fill_color() != self.fill {
            doc.set_fill_color(self.fill);
        }
        if doc.text_color() != self.text {
            doc.set_text_color(self.text);
        }
        if doc.line_width() != self.line_width {
            doc.set_line_width(self.line_width);
        }
    }
}
