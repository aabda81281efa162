//! Table of contents with logical page numbering.
//!
//! Entries are collected while the body is written. `insert_toc` prints
//! them at the end of the document, then moves the printed pages to the
//! requested position, shifting the pages in between.

use serde::{Deserialize, Serialize};

use crate::border::Border;
use crate::document::{CellMove, PdfDocument};
use crate::page::{Link, LinkId};
use crate::style::{Alignment, Font, FontName, FontStyle};

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    pub text: String,
    pub level: usize,
    /// Logical page number printed in the table.
    pub page: usize,
    pub link: LinkId,
}

/// Page numbering and collected entries.
#[derive(Debug, Clone, Default)]
pub struct TocState {
    pub(crate) entries: Vec<TocEntry>,
    pub(crate) numbering: bool,
    pub(crate) numbering_footer: bool,
    pub(crate) numbered_page: usize,
}

/// Appearance of the printed table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocOptions {
    pub title: String,
    pub title_size: f32,
    pub entry_size: f32,
    pub font: FontName,
    /// Indent of one level.
    pub indent: f32,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            title: "Table of Contents".to_string(),
            title_size: 20.0,
            entry_size: 10.0,
            font: FontName::Times,
            indent: 8.0,
        }
    }
}

/// Maps a 1-based page number to its position after `toc_start..=last`
/// have been moved in front of `location`.
pub fn relocated_page(page: usize, location: usize, toc_start: usize, last: usize) -> usize {
    let toc_len = last + 1 - toc_start;
    if page < location || page > last {
        page
    } else if page < toc_start {
        page + toc_len
    } else {
        location + (page - toc_start)
    }
}

impl PdfDocument {
    /// Starts logical page numbering; numbers are printed in the footer.
    pub fn start_page_nums(&mut self) {
        self.toc.numbering = true;
        self.toc.numbering_footer = true;
    }

    /// Stops numbering after the current page.
    pub fn stop_page_nums(&mut self) {
        self.toc.numbering = false;
    }

    /// Current logical page number.
    pub fn num_page_no(&self) -> usize {
        self.toc.numbered_page
    }

    /// Records an entry pointing at the current position and returns its
    /// link.
    pub fn toc_add_entry(&mut self, text: &str, level: usize) -> LinkId {
        let link = self.add_link();
        self.toc.entries.push(TocEntry {
            text: text.to_string(),
            level,
            page: self.toc.numbered_page,
            link,
        });
        link
    }

    pub fn toc_entries(&self) -> &[TocEntry] {
        &self.toc.entries
    }

    /// Prints the table of contents and moves it to page `location`.
    /// Returns the number of pages it takes.
    pub fn insert_toc(&mut self, location: usize, options: &TocOptions) -> usize {
        self.stop_page_nums();
        self.add_page();
        let toc_start = self.page_no();

        let title_font = Font::new(options.font, FontStyle::BOLD, options.title_size);
        self.set_font(title_font);
        self.cell(0.0, 5.0, &options.title, Border::None, CellMove::NextLine, Alignment::Center, false, None);
        self.ln(Some(10.0));

        let printable = self.printable_width();
        let entries = self.toc.entries.clone();
        for entry in &entries {
            let offset = entry.level as f32 * options.indent;
            let regular = Font::new(options.font, FontStyle::empty(), options.entry_size);
            let font = if entry.level == 0 { regular.bold() } else { regular };
            self.set_font(font);
            let height = self.font_size() + 2.0;
            let link = Some(Link::Internal(entry.link));

            if offset > 0.0 {
                self.cell(offset, height, "", Border::None, CellMove::Right, Alignment::Left, false, None);
            }
            self.set_font(regular);
            let page_text = entry.page.to_string();
            let page_width = self.get_string_width(&page_text) + 2.0;
            let dot_width = self.get_string_width(".");
            self.set_font(font);

            let available = printable - offset - page_width;
            let mut text = entry.text.clone();
            let mut text_width = self.get_string_width(&text) + 2.0;
            while text_width > available && !text.is_empty() {
                text.pop();
                text_width = self.get_string_width(&text) + 2.0;
            }
            self.cell(text_width, height, &text, Border::None, CellMove::Right, Alignment::Left, false, link.clone());

            self.set_font(regular);
            let dots_width = printable - page_width - offset - text_width;
            if dots_width > 0.0 {
                let count = (dots_width / dot_width) as usize;
                self.cell(dots_width, height, &".".repeat(count), Border::None, CellMove::Right, Alignment::Right, false, link.clone());
            }
            self.cell(page_width, height, &page_text, Border::None, CellMove::NextLine, Alignment::Right, false, link);
        }

        let last = self.page_no();
        let toc_len = last + 1 - toc_start;
        let location = location.clamp(1, toc_start);
        self.move_pages(location, toc_start, last);
        log::debug!("table of contents ({toc_len} pages) moved to page {location}");
        toc_len
    }

    /// Moves pages `toc_start..=last` in front of page `location` and
    /// remaps link and bookmark destinations.
    fn move_pages(&mut self, location: usize, toc_start: usize, last: usize) {
        if location >= toc_start {
            return;
        }
        let toc_len = last + 1 - toc_start;
        self.pages_mut()[location - 1..last].rotate_right(toc_len);
        for target in self.links_mut() {
            target.page = relocated_page(target.page, location, toc_start, last);
        }
        for bookmark in &mut self.bookmarks {
            bookmark.page = relocated_page(bookmark.page, location, toc_start, last);
        }
        self.set_page_no(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::DrawOp;

    #[test]
    fn relocation_matches_rotation() {
        for last in 2..8 {
            for toc_start in 2..=last {
                for location in 1..=toc_start {
                    let mut pages: Vec<usize> = (1..=last).collect();
                    pages[location - 1..last].rotate_right(last + 1 - toc_start);
                    for (slot, original) in pages.iter().enumerate() {
                        assert_eq!(
                            relocated_page(*original, location, toc_start, last),
                            slot + 1,
                            "page {original} location {location} toc {toc_start}..={last}"
                        );
                    }
                }
            }
        }
    }

    fn body(doc: &mut PdfDocument, pages: usize) {
        doc.start_page_nums();
        for i in 1..=pages {
            doc.add_page();
            doc.toc_add_entry(&format!("Chapter {i}"), 0);
            doc.cell(0.0, 5.0, &format!("P{i}"), Border::None, CellMove::NextLine, Alignment::Left, false, None);
        }
    }

    fn first_texts(doc: &PdfDocument) -> Vec<String> {
        doc.pages()
            .iter()
            .map(|p| p.texts().next().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn toc_moves_to_location() {
        let mut doc = PdfDocument::default();
        body(&mut doc, 3);
        let pages = doc.insert_toc(2, &TocOptions::default());
        assert_eq!(pages, 1);
        assert_eq!(
            first_texts(&doc),
            vec!["P1", "Table of Contents", "P2", "P3"]
        );
        assert_eq!(doc.page_no(), 4);
        // chapter 3 was on page 3, now on page 4
        let link = doc.toc_entries()[2].link;
        assert_eq!(doc.link_target(link).unwrap().page, 4);
    }

    #[test]
    fn multi_page_toc() {
        let mut doc = PdfDocument::default();
        doc.start_page_nums();
        doc.add_page();
        for i in 0..60 {
            doc.toc_add_entry(&format!("Section {i}"), i % 2);
        }
        doc.cell(0.0, 5.0, "Body", Border::None, CellMove::NextLine, Alignment::Left, false, None);
        doc.add_bookmark("Body", 0, true, false);
        let pages = doc.insert_toc(1, &TocOptions::default());
        assert!(pages > 1);
        let texts = first_texts(&doc);
        assert_eq!(texts[0], "Table of Contents");
        assert_eq!(texts[pages], "Body");
        assert_eq!(doc.bookmarks()[0].page, pages + 1);
    }

    #[test]
    fn long_entries_stay_inside_the_margins() {
        let mut doc = PdfDocument::default();
        doc.start_page_nums();
        doc.add_page();
        doc.toc_add_entry(&"Quarterly W".repeat(30), 0);
        let options = TocOptions::default();
        doc.insert_toc(1, &options);
        doc.set_font(Font::new(options.font, FontStyle::BOLD, options.entry_size));

        let right = doc.page_width() - doc.right_margin();
        for op in &doc.pages()[0].ops {
            if let DrawOp::Text { x, text, .. } = op {
                let end = x + doc.get_string_width(text);
                assert!(end <= right + 1e-3, "{text} ends at {end}");
            }
        }
        assert!(doc.pages()[0].texts().any(|t| t == "1"));
    }

    #[test]
    fn location_is_clamped() {
        let mut doc = PdfDocument::default();
        body(&mut doc, 2);
        doc.insert_toc(99, &TocOptions::default());
        assert_eq!(first_texts(&doc), vec!["P1", "P2", "Table of Contents"]);
    }

    #[test]
    fn toc_pages_are_not_numbered() {
        let mut doc = PdfDocument::default();
        body(&mut doc, 2);
        assert_eq!(doc.num_page_no(), 2);
        doc.insert_toc(1, &TocOptions::default());
        doc.close();
        // the body pages now follow the table of contents
        assert!(doc.pages()[1].texts().any(|t| t == "1"));
        assert!(doc.pages()[2].texts().any(|t| t == "2"));
        // only the entry page numbers appear on the table itself
        assert_eq!(doc.pages()[0].texts().filter(|t| *t == "1").count(), 1);
        assert!(!doc.pages()[0].texts().any(|t| t == "3"));
    }
}
