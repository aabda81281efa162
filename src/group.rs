//! Grouped tables: a group row is printed whenever the group key changes
//! and replayed after every page break.

use std::ops::{Deref, DerefMut};

use crate::border::Border;
use crate::cell::Cell;
use crate::document::PdfDocument;
use crate::error::{PdfError, Result};
use crate::style::{Alignment, Style};
use crate::table::Table;

/// The current group of a [`GroupTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub key: Option<String>,
    pub alignment: Alignment,
    pub border: Border,
    pub style: Style,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            name: String::new(),
            key: None,
            alignment: Alignment::Left,
            border: Border::All,
            style: Style::bold().with_fill_color(crate::color::FillColor::header()),
        }
    }
}

impl Group {
    pub fn is_name(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Hook replacing the default group row.
pub trait GroupListener {
    /// Returns `true` when the group was drawn by the listener.
    fn output_group(&mut self, doc: &mut PdfDocument, group: &Group) -> bool;
}

/// A [`Table`] with a current group. Table configuration and cell methods
/// are reached through `Deref`.
pub struct GroupTable {
    table: Table,
    group: Group,
    group_before_header: bool,
    in_progress: bool,
    listener: Option<Box<dyn GroupListener>>,
}

impl Deref for GroupTable {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.table
    }
}

impl DerefMut for GroupTable {
    fn deref_mut(&mut self) -> &mut Table {
        &mut self.table
    }
}

impl GroupTable {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            group: Group::default(),
            group_before_header: false,
            in_progress: false,
            listener: None,
        }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn group_mut(&mut self) -> &mut Group {
        &mut self.group
    }

    pub fn set_group_style(&mut self, style: Style) -> &mut Self {
        self.group.style = style;
        self
    }

    pub fn set_group_listener(&mut self, listener: Option<Box<dyn GroupListener>>) -> &mut Self {
        self.listener = listener;
        self
    }

    pub fn is_group_before_header(&self) -> bool {
        self.group_before_header
    }

    /// Prints the group above the repeated headers after a page break
    /// instead of below them.
    pub fn set_group_before_header(&mut self, before: bool) -> &mut Self {
        self.group_before_header = before;
        self
    }

    /// Changes the group key; when it differs from the current one, the
    /// group is renamed after the key and printed.
    pub fn set_group_key(&mut self, doc: &mut PdfDocument, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        if self.group.key.as_deref() == Some(key.as_str()) {
            return Ok(());
        }
        if self.table.is_row_started() {
            return Err(PdfError::RowAlreadyStarted);
        }
        self.group.name = key.clone();
        self.group.key = Some(key);
        self.output_group(doc)
    }

    /// Prints the current group as a full row.
    pub fn output_group(&mut self, doc: &mut PdfDocument) -> Result<()> {
        if self.in_progress || !self.group.is_name() {
            return Ok(());
        }
        self.in_progress = true;
        let result = self.output_group_row(doc);
        self.in_progress = false;
        result
    }

    fn output_group_row(&mut self, doc: &mut PdfDocument) -> Result<()> {
        if let Some(mut listener) = self.listener.take() {
            let handled = listener.output_group(doc, &self.group);
            self.listener = Some(listener);
            if handled {
                return Ok(());
            }
        }
        let cell = Cell::new(self.group.name.clone())
            .with_cols(self.table.column_count())
            .with_alignment(self.group.alignment)
            .with_border(self.group.border);
        self.table.start_row(Some(self.group.style))?;
        self.table.add_cell(cell)?;
        self.end_row(doc)
    }

    /// Closes the open row; a page break replays the group.
    pub fn end_row(&mut self, doc: &mut PdfDocument) -> Result<()> {
        let row = self.table.prepare_row(doc)?;
        self.check_new_page(doc, row.height)?;
        self.table.draw_row(doc, &row)
    }

    pub fn complete_row(&mut self, doc: &mut PdfDocument, end_row: bool) -> Result<()> {
        self.table.complete_row(doc, false)?;
        if end_row {
            self.end_row(doc)?;
        }
        Ok(())
    }

    pub fn add_row<S: AsRef<str>>(
        &mut self,
        doc: &mut PdfDocument,
        values: &[S],
        style: Option<Style>,
    ) -> Result<()> {
        self.table.start_row(style)?;
        for value in values {
            self.table.add(value.as_ref())?;
        }
        self.end_row(doc)
    }

    /// Like [`Table::check_new_page`], printing the group on the new page.
    pub fn check_new_page(&mut self, doc: &mut PdfDocument, height: f32) -> Result<bool> {
        if self.in_progress || self.table.is_in_header() {
            return self.table.check_new_page(doc, height);
        }
        if !self.group_before_header || !self.table.is_repeat_header() {
            let added = self.table.check_new_page(doc, height)?;
            if added {
                self.output_group(doc)?;
            }
            return Ok(added);
        }

        self.table.set_repeat_header(false);
        let added = self.table.check_new_page(doc, height);
        self.table.set_repeat_header(true);
        if added? {
            self.output_group(doc)?;
            self.table.output_headers(doc)?;
            return Ok(true);
        }
        Ok(false)
    }
}
