//! Error taxonomy shared by every layout component.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the layout engine and the document writer.
#[derive(Error, Debug)]
pub enum PdfError {
    /// `start_row` was called while a row is already open.
    #[error("a row is already started")]
    RowAlreadyStarted,

    /// A cell was added (or a row ended) with no open row.
    #[error("no row is started")]
    RowNotStarted,

    /// `end_row` was called before any cell was added.
    #[error("no cell to add in the row")]
    EmptyRow,

    /// The column spans of the row do not add up to the column count.
    #[error("invalid spanned cells: expected {expected}, found {actual}")]
    ColumnSpanMismatch { expected: usize, actual: usize },

    /// Headers were requested from a table without any column.
    #[error("no column is defined")]
    NoColumns,

    #[error("image file '{}' does not exist", .0.display())]
    ImageNotFound(PathBuf),

    #[error("image error: {0}")]
    Image(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("unknown label format '{0}'")]
    UnknownLabelFormat(String),

    #[error("label format '{name}' has an empty grid ({cols}x{rows} labels)")]
    EmptyLabelGrid { name: String, cols: usize, rows: usize },

    #[error("unsupported label font size: {0}")]
    UnsupportedFontSize(f32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF generation error: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for PdfError {
    fn from(err: lopdf::Error) -> Self {
        PdfError::Pdf(err.to_string())
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, PdfError>;
