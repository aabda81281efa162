//! Page buffer – the intermediate representation between the layout engine
//! and PDF rendering. Every drawing call on the document is recorded here
//! as a [`DrawOp`], in user units with a top-left origin.

use serde::{Deserialize, Serialize};

use crate::border::RectangleStyle;
use crate::color::Color;
use crate::style::Font;

/// Identifier of an internal link returned by `PdfDocument::add_link`.
pub type LinkId = usize;

/// A clickable target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Link {
    /// Jump to a destination inside the document.
    Internal(LinkId),
    /// Open an external URL.
    Url(String),
}

impl From<LinkId> for Link {
    fn from(id: LinkId) -> Self {
        Link::Internal(id)
    }
}

impl From<&str> for Link {
    fn from(url: &str) -> Self {
        Link::Url(url.to_string())
    }
}

/// Destination of an internal link: a 1-based page and a y position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub page: usize,
    pub y: f32,
}

/// A clickable region on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub link: Link,
}

/// A single recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    SetFont(Font),
    SetLineWidth(f32),
    SetDrawColor(Color),
    SetFillColor(Color),
    SetTextColor(Color),
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        style: RectangleStyle,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        style: RectangleStyle,
    },
    /// Text drawn from its baseline origin, rotated counter-clockwise by
    /// `angle` degrees.
    Text {
        x: f32,
        y: f32,
        text: String,
        angle: f32,
    },
    /// Image from a file path or a base64 `data:` URI.
    Image {
        source: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

impl DrawOp {
    /// True for operations that put visible marks on the page.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            DrawOp::Rect { .. }
                | DrawOp::Line { .. }
                | DrawOp::Polygon { .. }
                | DrawOp::Text { .. }
                | DrawOp::Image { .. }
        )
    }
}

/// One page of recorded content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
    pub links: Vec<LinkArea>,
}

impl Page {
    /// Texts drawn on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn shape_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_shape()).count()
    }
}
