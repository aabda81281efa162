//! Bookmarks and the document outline.
//!
//! Bookmarks are collected as a flat list of `(text, level, page, y)`
//! entries. [`build_outline`] turns that list into the parent / first /
//! last / next / prev index structure of a PDF outline tree, and
//! [`PdfDocument::add_page_index`] prints it as an index page.

use serde::{Deserialize, Serialize};

use crate::border::Border;
use crate::document::{CellMove, PdfDocument};
use crate::page::{Link, LinkId};
use crate::style::{Alignment, Font, Style};

/// Indent of one bookmark level on the index page.
const LEVEL_INDENT: f32 = 5.0;

/// A flat outline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub text: String,
    pub level: usize,
    /// Destination y position, in user units from the top of the page.
    pub y: f32,
    /// 1-based destination page.
    pub page: usize,
    pub link: Option<LinkId>,
}

/// Tree links of a bookmark. Indices point into the bookmark list; the
/// sentinel `parent == bookmarks.len()` is the outline root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineNode {
    pub parent: usize,
    pub first: Option<usize>,
    pub last: Option<usize>,
    pub next: Option<usize>,
    pub prev: Option<usize>,
    /// Number of descendants.
    pub count: usize,
}

/// Rebuilds the outline tree from bookmarks whose levels never increase
/// by more than one from an entry to the next.
pub fn build_outline(bookmarks: &[Bookmark]) -> Vec<OutlineNode> {
    let root = bookmarks.len();
    let mut nodes = vec![
        OutlineNode {
            parent: root,
            first: None,
            last: None,
            next: None,
            prev: None,
            count: 0,
        };
        bookmarks.len()
    ];
    // last entry seen at each level
    let mut last_at_level: Vec<usize> = Vec::new();
    let mut level = 0;

    for (index, bookmark) in bookmarks.iter().enumerate() {
        let current = bookmark.level.min(last_at_level.len());
        if current > 0 {
            let parent = last_at_level[current - 1];
            nodes[index].parent = parent;
            nodes[parent].last = Some(index);
            if current > level {
                nodes[parent].first = Some(index);
            }
        }
        if current <= level && index > 0 {
            if let Some(&prev) = last_at_level.get(current) {
                nodes[prev].next = Some(index);
                nodes[index].prev = Some(prev);
            }
        }
        last_at_level.truncate(current);
        last_at_level.push(index);
        level = current;
    }

    for index in 0..nodes.len() {
        let mut parent = nodes[index].parent;
        while parent != root {
            nodes[parent].count += 1;
            parent = nodes[parent].parent;
        }
    }
    nodes
}

impl PdfDocument {
    /// Adds a bookmark at the current page. The level is clamped so it
    /// is at most one deeper than the previous bookmark. Returns the
    /// bookmark index.
    pub fn add_bookmark(
        &mut self,
        text: &str,
        level: usize,
        use_current_y: bool,
        create_link: bool,
    ) -> usize {
        if self.page_no() == 0 {
            self.add_page();
        }
        let max_level = self.bookmarks.last().map_or(0, |b| b.level + 1);
        let level = level.min(max_level);
        let y = if use_current_y { self.get_y() } else { 0.0 };
        let link = create_link.then(|| {
            let id = self.add_link();
            self.set_link(id, Some(y), None);
            id
        });
        self.bookmarks.push(Bookmark {
            text: text.to_string(),
            level,
            y,
            page: self.page_no(),
            link,
        });
        self.bookmarks.len() - 1
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Prints an index page listing every bookmark with a dotted leader
    /// and its page number. Does nothing without bookmarks.
    pub fn add_page_index(
        &mut self,
        title: &str,
        title_style: Option<Style>,
        content_style: Option<Style>,
        add_bookmark: bool,
    ) {
        if self.bookmarks.is_empty() {
            log::debug!("page index skipped: no bookmark");
            return;
        }
        self.add_page();
        let title_index = add_bookmark.then(|| self.add_bookmark(title, 0, false, false));

        let title_style =
            title_style.unwrap_or_else(|| Style::no_border().with_font(Font::default().bold().with_size(12.0)));
        title_style.apply(self);
        let height = title_style.line_height();
        self.cell(0.0, height, title, Border::None, CellMove::NextLine, Alignment::Center, false, None);
        self.ln(Some(height / 2.0));

        let style = content_style.unwrap_or_else(Style::no_border);
        style.apply(self);
        let height = style.line_height();
        let margin = self.cell_margin();
        let printable = self.printable_width();
        let dot_width = self.get_string_width(".");

        let entries = self.bookmarks.clone();
        for (index, bookmark) in entries.iter().enumerate() {
            if Some(index) == title_index {
                continue;
            }
            let link = bookmark.link.unwrap_or_else(|| {
                let id = self.add_link();
                self.set_link(id, Some(bookmark.y), Some(bookmark.page));
                id
            });
            let offset = bookmark.level as f32 * LEVEL_INDENT;
            let page_text = bookmark.page.to_string();
            let page_width = self.get_string_width(&page_text) + 2.0 * margin;

            let available = printable - offset - page_width;
            let mut text = bookmark.text.clone();
            let mut text_width = self.get_string_width(&text) + 2.0 * margin;
            while text_width > available && !text.is_empty() {
                text.pop();
                text_width = self.get_string_width(&text) + 2.0 * margin;
            }

            if !self.is_printable(height) {
                self.add_page();
            }
            self.set_x(self.left_margin() + offset);
            self.cell(
                text_width,
                height,
                &text,
                Border::None,
                CellMove::Right,
                Alignment::Left,
                false,
                Some(Link::Internal(link)),
            );
            let dots_width = printable - offset - text_width - page_width;
            if dots_width > 0.0 {
                let count = ((dots_width - 2.0 * margin) / dot_width).floor().max(0.0) as usize;
                self.cell(
                    dots_width,
                    height,
                    &".".repeat(count),
                    Border::None,
                    CellMove::Right,
                    Alignment::Right,
                    false,
                    Some(Link::Internal(link)),
                );
            }
            self.cell(
                page_width,
                height,
                &page_text,
                Border::None,
                CellMove::NextLine,
                Alignment::Right,
                false,
                Some(Link::Internal(link)),
            );
        }
    }
}
