//! Table column definitions.

use serde::{Deserialize, Serialize};

use crate::style::Alignment;

/// A table column: header text, width in user units and the default
/// alignment of its cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub text: String,
    pub width: f32,
    pub alignment: Alignment,
    /// A fixed column keeps its width when the table is stretched to the
    /// full printable width.
    pub fixed: bool,
}

impl Column {
    pub fn new(text: impl Into<String>, width: f32) -> Self {
        Self {
            text: text.into(),
            width,
            alignment: Alignment::Left,
            fixed: false,
        }
    }

    pub fn left(text: impl Into<String>, width: f32) -> Self {
        Self::new(text, width)
    }

    pub fn center(text: impl Into<String>, width: f32) -> Self {
        Self::new(text, width).with_alignment(Alignment::Center)
    }

    pub fn right(text: impl Into<String>, width: f32) -> Self {
        Self::new(text, width).with_alignment(Alignment::Right)
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }
}
