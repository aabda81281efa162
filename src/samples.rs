//! Ready-made reports for demonstration and testing.
//!
//! Each sample exercises a different part of the layout engine: grouped
//! tables, charts with legends, bookmarks with an index page, a relocated
//! table of contents and label sheets.

use crate::border::Border;
use crate::cell::Cell;
use crate::chart::{
    legends_horizontal, BarAxis, BarChart, BarRow, BarValue, LegendEntry, PieChart, PieValue,
};
use crate::color::Color;
use crate::column::Column;
use crate::document::{CellMove, DocumentConfig, PdfDocument};
use crate::error::Result;
use crate::group::GroupTable;
use crate::label::LabelDocument;
use crate::style::{Alignment, Font, Style};
use crate::table::Table;
use crate::toc::TocOptions;

/// One line of the sales sample: region, product, units and unit price.
pub const SALES: &[(&str, &str, u32, f64)] = &[
    ("North", "Widgets", 120, 2.50),
    ("North", "Gadgets", 45, 12.00),
    ("North", "Gizmos", 80, 7.25),
    ("South", "Widgets", 95, 2.50),
    ("South", "Gadgets", 60, 12.00),
    ("East", "Widgets", 150, 2.40),
    ("East", "Gizmos", 30, 7.25),
    ("East", "Doohickeys", 210, 1.10),
    ("West", "Gadgets", 75, 11.50),
    ("West", "Gizmos", 55, 7.25),
];

const PALETTE: [Color; 4] = [
    Color::new(31, 119, 180),
    Color::new(255, 127, 14),
    Color::new(44, 160, 44),
    Color::new(214, 39, 40),
];

/// Revenue per region, in order of first appearance.
pub fn revenue_by_region() -> Vec<(&'static str, f64)> {
    let mut totals: Vec<(&'static str, f64)> = Vec::new();
    for (region, _, units, price) in SALES {
        let revenue = f64::from(*units) * price;
        match totals.iter_mut().find(|(name, _)| name == region) {
            Some((_, total)) => *total += revenue,
            None => totals.push((*region, revenue)),
        }
    }
    totals
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn heading(doc: &mut PdfDocument, text: &str, level: usize) {
    let size = if level == 0 { 14.0 } else { 11.0 };
    doc.set_font(Font::default().bold().with_size(size));
    doc.toc_add_entry(text, level);
    doc.add_bookmark(text, level, true, false);
    let height = doc.font().line_height();
    doc.cell(0.0, height, text, Border::None, CellMove::NextLine, Alignment::Left, false, None);
    doc.ln(Some(2.0));
    doc.set_font(Font::default());
}

/// Sales lines grouped by region with a total row.
pub fn sales_table(doc: &mut PdfDocument) -> Result<()> {
    let mut table = Table::new(true);
    table.add_columns([
        Column::left("Product", 60.0),
        Column::right("Units", 25.0).with_fixed(true),
        Column::right("Price", 25.0).with_fixed(true),
        Column::right("Revenue", 30.0),
    ]);
    let mut table = GroupTable::new(table);
    table.set_group_before_header(true);
    table.output_headers(doc)?;

    let mut total = 0.0;
    for (region, product, units, price) in SALES {
        table.set_group_key(doc, *region)?;
        let revenue = f64::from(*units) * price;
        total += revenue;
        table.add_row(
            doc,
            &[product.to_string(), units.to_string(), money(*price), money(revenue)],
            None,
        )?;
    }

    table.start_row(Some(Style::total()))?;
    table.add_cell(Cell::new("Total").with_cols(3))?;
    table.add(money(total))?;
    table.end_row(doc)
}

/// Stacked bar chart of the revenue per region and product, then a pie
/// chart of the regional shares with its legend.
pub fn sales_charts(doc: &mut PdfDocument) {
    let products = ["Widgets", "Gadgets", "Gizmos", "Doohickeys"];
    let rows: Vec<BarRow> = revenue_by_region()
        .into_iter()
        .map(|(region, _)| {
            let values = products
                .iter()
                .zip(PALETTE)
                .map(|(product, color)| {
                    let revenue: f64 = SALES
                        .iter()
                        .filter(|(r, p, _, _)| *r == region && p == product)
                        .map(|(_, _, units, price)| f64::from(*units) * price)
                        .sum();
                    BarValue::new(color, revenue)
                })
                .collect();
            BarRow::new(region, values)
        })
        .collect();
    let axis = BarAxis {
        formatter: Some(Box::new(|value: f64| format!("{value:.0} $"))),
        ..BarAxis::default()
    };
    BarChart::new(rows).with_axis(axis).with_height(70.0).draw(doc);
    let legend: Vec<LegendEntry> = products
        .iter()
        .zip(PALETTE)
        .map(|(product, color)| LegendEntry::new(color, *product))
        .collect();
    legends_horizontal(doc, &legend, None);
    doc.ln(Some(5.0));

    let shares = revenue_by_region();
    let slices = shares
        .iter()
        .zip(PALETTE)
        .map(|((_, revenue), color)| PieValue::new(color, *revenue))
        .collect();
    PieChart::new(slices, 30.0).draw(doc);
    doc.ln(Some(3.0));
    let legend: Vec<LegendEntry> = shares
        .iter()
        .zip(PALETTE)
        .map(|((region, _), color)| LegendEntry::new(color, *region))
        .collect();
    legends_horizontal(doc, &legend, None);
}

/// The full demo: numbered chapters, an index page and a table of
/// contents moved in front of the body.
pub fn sales_report(config: DocumentConfig) -> Result<PdfDocument> {
    let mut doc = PdfDocument::new(config);
    doc.start_page_nums();

    doc.add_page();
    heading(&mut doc, "Sales by region", 0);
    sales_table(&mut doc)?;

    doc.add_page();
    heading(&mut doc, "Charts", 0);
    heading(&mut doc, "Revenue per product", 1);
    sales_charts(&mut doc);

    doc.add_page_index("Index", None, None, true);
    let toc_pages = doc.insert_toc(1, &TocOptions::default());
    log::debug!("sales report: {} pages, toc on {toc_pages}", doc.page_count());
    Ok(doc)
}

/// Splits text into label blocks separated by blank lines.
pub fn label_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

/// Prints one label per block of `text`.
pub fn label_sheet(format: &str, text: &str, border: bool) -> Result<LabelDocument> {
    let mut labels = LabelDocument::named(format)?.with_border(border);
    for block in label_blocks(text) {
        labels.add_label(&block);
    }
    Ok(labels)
}
