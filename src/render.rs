//! PDF renderer – turns the recorded page buffer of a [`PdfDocument`] into
//! PDF bytes using `printpdf` (v0.8 ops-based API), then adds link
//! annotations and the outline tree and re-encodes text strings to
//! WinAnsi with `lopdf`.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use lopdf::content::Content;
use lopdf::{dictionary, Object, ObjectId, StringFormat};
use printpdf::{
    BuiltinFont, Color as PdfColor, Line as PdfLine, LinePoint, Mm, Op, PaintMode,
    PdfDocument as PdfWriter, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Polygon, PolygonRing,
    Pt, RawImage, Rgb, TextItem, TextMatrix, WindingOrder, XObjectId, XObjectTransform,
};

use crate::border::RectangleStyle;
use crate::color::Color;
use crate::document::PdfDocument;
use crate::error::{PdfError, Result};
use crate::outline::build_outline;
use crate::page::{DrawOp, Link};
use crate::style::{Font, FontName};

/// A printpdf XObject together with the pixel dimensions of the source image.
struct ImageResource {
    xobj_id: XObjectId,
    px_width: u32,
    px_height: u32,
}

/// Render a document into PDF bytes.
///
/// Images that cannot be read or decoded are skipped with a `log::warn`.
pub fn render_pdf(doc: &PdfDocument) -> Result<Vec<u8>> {
    let k = doc.scale_factor();
    let mm_factor = doc.config().unit.mm_factor();
    let page_w = Mm(doc.page_width() * mm_factor);
    let page_h = Mm(doc.page_height() * mm_factor);
    let page_height_pt = doc.page_height() * k;

    let mut writer = PdfWriter::new(doc.title());

    // ── Pre-register all images ────────────────────────────────────────────
    let mut image_resources: HashMap<String, ImageResource> = HashMap::new();
    let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();

    for page in doc.pages() {
        for op in &page.ops {
            let DrawOp::Image { source, .. } = op else {
                continue;
            };
            if image_resources.contains_key(source) {
                continue;
            }
            let bytes = match load_image_bytes(source) {
                Ok(b) => b,
                Err(e) => {
                    log::warn!("Skipping image: {e}");
                    continue;
                }
            };
            let dyn_img = match ::image::load_from_memory(&bytes) {
                Ok(img) => img,
                Err(e) => {
                    log::warn!("Skipping image, decode error: {e}");
                    continue;
                }
            };
            let raw = match RawImage::decode_from_bytes(&bytes, &mut img_warnings) {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("Skipping image, PDF encode error: {e}");
                    continue;
                }
            };
            image_resources.insert(
                source.clone(),
                ImageResource {
                    xobj_id: writer.add_image(&raw),
                    px_width: dyn_img.width(),
                    px_height: dyn_img.height(),
                },
            );
        }
    }

    // ── Render pages ──────────────────────────────────────────────────────
    let mut pages = Vec::new();
    for page in doc.pages() {
        let mut state = RenderState::new(doc, k, page_height_pt);
        for op in &page.ops {
            state.render_op(op, &image_resources);
        }
        pages.push(PdfPage::new(page_w, page_h, state.ops));
    }
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    writer.with_pages(pages);
    let bytes = writer.save(&PdfSaveOptions::default(), &mut Vec::new());

    let has_links = doc.pages().iter().any(|p| !p.links.is_empty());
    let has_latin = doc
        .pages()
        .iter()
        .flat_map(|p| p.texts())
        .any(|text| !text.is_ascii());
    if !has_links && doc.bookmarks.is_empty() && !has_latin {
        return Ok(bytes);
    }
    post_process(&bytes, doc, page_height_pt, has_latin)
}

// ---------------------------------------------------------------------------
// Page ops
// ---------------------------------------------------------------------------

/// Graphic state tracked while converting recorded ops.
struct RenderState<'a> {
    doc: &'a PdfDocument,
    k: f32,
    page_height: f32,
    font: Font,
    fill: Color,
    text: Color,
    draw: Color,
    line_width: f32,
    ops: Vec<Op>,
}

impl<'a> RenderState<'a> {
    fn new(doc: &'a PdfDocument, k: f32, page_height: f32) -> Self {
        Self {
            doc,
            k,
            page_height,
            font: Font::default(),
            fill: Color::WHITE,
            text: Color::BLACK,
            draw: Color::BLACK,
            line_width: 0.2,
            ops: Vec::new(),
        }
    }

    /// User-space point (top-left origin) to PDF point (bottom-left origin).
    fn point(&self, x: f32, y: f32) -> Point {
        Point {
            x: Pt(x * self.k),
            y: Pt(self.page_height - y * self.k),
        }
    }

    fn render_op(&mut self, op: &DrawOp, images: &HashMap<String, ImageResource>) {
        match op {
            DrawOp::SetFont(font) => self.font = *font,
            DrawOp::SetLineWidth(width) => {
                self.line_width = *width;
                self.ops.push(Op::SetOutlineThickness {
                    pt: Pt(width * self.k),
                });
            }
            DrawOp::SetDrawColor(color) => {
                self.draw = *color;
                self.ops.push(Op::SetOutlineColor { col: pdf_color(*color) });
            }
            DrawOp::SetFillColor(color) => self.fill = *color,
            DrawOp::SetTextColor(color) => self.text = *color,
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                style,
            } => {
                let corners = [
                    (*x, *y),
                    (x + width, *y),
                    (x + width, y + height),
                    (*x, y + height),
                ];
                self.draw_polygon(&corners, *style);
            }
            DrawOp::Line { x1, y1, x2, y2 } => {
                let points = vec![self.point(*x1, *y1), self.point(*x2, *y2)];
                self.stroke(points, false);
            }
            DrawOp::Polygon { points, style } => self.draw_polygon(points, *style),
            DrawOp::Text { x, y, text, angle } => self.draw_text(*x, *y, text, *angle),
            DrawOp::Image {
                source,
                x,
                y,
                width,
                height,
            } => {
                let Some(res) = images.get(source) else {
                    return;
                };
                // At dpi=72 printpdf renders 1 px = 1 pt, so
                // scale = desired_pt / px_dim.
                let (w_pt, h_pt) = (width * self.k, height * self.k);
                let scale_x = if res.px_width > 0 {
                    w_pt / res.px_width as f32
                } else {
                    1.0
                };
                let scale_y = if res.px_height > 0 {
                    h_pt / res.px_height as f32
                } else {
                    1.0
                };
                self.ops.push(Op::UseXobject {
                    id: res.xobj_id.clone(),
                    transform: XObjectTransform {
                        translate_x: Some(Pt(x * self.k)),
                        translate_y: Some(Pt(self.page_height - (y + height) * self.k)),
                        dpi: Some(72.0),
                        scale_x: Some(scale_x),
                        scale_y: Some(scale_y),
                        rotate: None,
                    },
                });
            }
        }
    }

    fn draw_polygon(&mut self, points: &[(f32, f32)], style: RectangleStyle) {
        if style.is_fill() {
            self.ops.push(Op::SetFillColor {
                col: pdf_color(self.fill),
            });
        }
        let mode = match style {
            RectangleStyle::Fill => PaintMode::Fill,
            RectangleStyle::Draw => PaintMode::Stroke,
            RectangleStyle::Both => PaintMode::FillStroke,
        };
        let points = points
            .iter()
            .map(|(x, y)| LinePoint {
                p: self.point(*x, *y),
                bezier: false,
            })
            .collect();
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    fn stroke(&mut self, points: Vec<Point>, is_closed: bool) {
        self.ops.push(Op::DrawLine {
            line: PdfLine {
                points: points
                    .into_iter()
                    .map(|p| LinePoint { p, bezier: false })
                    .collect(),
                is_closed,
            },
        });
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, angle: f32) {
        let font = builtin_font(&self.font);
        let origin = self.point(x, y);

        self.ops.push(Op::StartTextSection);
        if angle.abs() > f32::EPSILON {
            self.ops.push(Op::SetTextMatrix {
                matrix: TextMatrix::TranslateRotate(origin.x, origin.y, angle),
            });
        } else {
            self.ops.push(Op::SetTextCursor { pos: origin });
        }
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(self.font.size),
            font,
        });
        self.ops.push(Op::SetFillColor {
            col: pdf_color(self.text),
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        });
        self.ops.push(Op::EndTextSection);

        if self.font.is_underline() && angle.abs() <= f32::EPSILON {
            let width = self.doc.fonts().measure_text_width(text, &self.font);
            let underline_y = origin.y.0 - self.font.size * 0.1;
            self.ops.push(Op::SetOutlineThickness {
                pt: Pt(self.font.size * 0.05),
            });
            self.ops.push(Op::SetOutlineColor {
                col: pdf_color(self.text),
            });
            self.stroke(
                vec![
                    Point {
                        x: origin.x,
                        y: Pt(underline_y),
                    },
                    Point {
                        x: Pt(origin.x.0 + width),
                        y: Pt(underline_y),
                    },
                ],
                false,
            );
            self.ops.push(Op::SetOutlineThickness {
                pt: Pt(self.line_width * self.k),
            });
            self.ops.push(Op::SetOutlineColor {
                col: pdf_color(self.draw),
            });
        }
    }
}

fn pdf_color(color: Color) -> PdfColor {
    let [r, g, b] = color.to_unit();
    PdfColor::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

/// Maps a font to one of the 14 standard PDF fonts.
fn builtin_font(font: &Font) -> BuiltinFont {
    match (font.name, font.is_bold(), font.is_italic()) {
        (FontName::Helvetica, false, false) => BuiltinFont::Helvetica,
        (FontName::Helvetica, true, false) => BuiltinFont::HelveticaBold,
        (FontName::Helvetica, false, true) => BuiltinFont::HelveticaOblique,
        (FontName::Helvetica, true, true) => BuiltinFont::HelveticaBoldOblique,
        (FontName::Times, false, false) => BuiltinFont::TimesRoman,
        (FontName::Times, true, false) => BuiltinFont::TimesBold,
        (FontName::Times, false, true) => BuiltinFont::TimesItalic,
        (FontName::Times, true, true) => BuiltinFont::TimesBoldItalic,
        (FontName::Courier, false, false) => BuiltinFont::Courier,
        (FontName::Courier, true, false) => BuiltinFont::CourierBold,
        (FontName::Courier, false, true) => BuiltinFont::CourierOblique,
        (FontName::Courier, true, true) => BuiltinFont::CourierBoldOblique,
        (FontName::Symbol, _, _) => BuiltinFont::Symbol,
        (FontName::ZapfDingbats, _, _) => BuiltinFont::ZapfDingbats,
    }
}

/// Encode a UTF-8 string as Windows-1252 bytes (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn winlatin_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{201A}' => 0x82, // single low-9 quote
            '\u{201E}' => 0x84, // double low-9 quote
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{2122}' => 0x99, // trademark
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Rewrites UTF-8 text operands of the page content streams as WinAnsi
/// bytes, matching the encoding of the standard fonts.
fn encode_page_text(pdf: &mut lopdf::Document) -> Result<()> {
    let page_ids: Vec<ObjectId> = pdf.get_pages().into_values().collect();
    for page_id in page_ids {
        let mut content = Content::decode(&pdf.get_page_content(page_id)?)?;
        let mut changed = false;
        for operation in &mut content.operations {
            if matches!(operation.operator.as_str(), "Tj" | "TJ" | "'" | "\"") {
                for operand in &mut operation.operands {
                    changed |= encode_string(operand);
                }
            }
        }
        if changed {
            pdf.change_page_content(page_id, content.encode()?)?;
        }
    }
    Ok(())
}

fn encode_string(operand: &mut Object) -> bool {
    match operand {
        Object::String(bytes, _) if !bytes.is_ascii() => {
            let Ok(text) = std::str::from_utf8(bytes) else {
                return false;
            };
            let encoded = winlatin_bytes(text);
            *bytes = encoded;
            true
        }
        Object::Array(items) => items
            .iter_mut()
            .fold(false, |changed, item| encode_string(item) | changed),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Parse a `data:<mime>;base64,<data>` URI and return the raw decoded bytes.
fn parse_data_uri(src: &str) -> std::result::Result<Vec<u8>, String> {
    let rest = &src["data:".len()..];
    let comma_pos = rest.find(',').ok_or_else(|| {
        "Invalid data URI: missing `,` separator between header and data".to_string()
    })?;
    let header = &rest[..comma_pos];
    if !header.contains(";base64") {
        return Err("Only base64-encoded data URIs are supported".to_string());
    }
    let b64_data = rest[comma_pos + 1..].trim();
    BASE64_STD
        .decode(b64_data)
        .map_err(|e| format!("Base64 decode error: {e}"))
}

/// Reads image bytes from a file path or a base64 `data:` URI.
pub(crate) fn load_image_bytes(source: &str) -> Result<Vec<u8>> {
    if source.starts_with("data:") {
        return parse_data_uri(source).map_err(PdfError::Image);
    }
    std::fs::read(source).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PdfError::ImageNotFound(source.into()),
        _ => PdfError::Io(e),
    })
}

/// Pixel width and height of an image source.
pub(crate) fn image_dimensions(source: &str) -> Result<(u32, u32)> {
    let bytes = load_image_bytes(source)?;
    let img = ::image::load_from_memory(&bytes).map_err(|e| PdfError::Image(e.to_string()))?;
    Ok((img.width(), img.height()))
}

// ---------------------------------------------------------------------------
// lopdf post-pass
// ---------------------------------------------------------------------------

fn post_process(
    bytes: &[u8],
    doc: &PdfDocument,
    page_height: f32,
    encode_text: bool,
) -> Result<Vec<u8>> {
    let k = doc.scale_factor();
    let mut pdf = lopdf::Document::load_mem(bytes)?;
    if encode_text {
        encode_page_text(&mut pdf)?;
    }
    let page_ids: Vec<ObjectId> = pdf.get_pages().into_values().collect();
    let destination = |page: usize, y: f32| -> Option<Vec<Object>> {
        let page_id = page.checked_sub(1).and_then(|i| page_ids.get(i))?;
        Some(vec![
            Object::Reference(*page_id),
            "FitH".into(),
            (page_height - y * k).into(),
        ])
    };

    let mut annots_by_page: Vec<(ObjectId, Vec<Object>)> = Vec::new();
    for (index, page) in doc.pages().iter().enumerate() {
        let Some(&page_id) = page_ids.get(index) else {
            continue;
        };
        let mut annots = Vec::new();
        for area in &page.links {
            let action = match &area.link {
                Link::Internal(id) => {
                    let Some(dest) = doc
                        .link_target(*id)
                        .and_then(|target| destination(target.page, target.y))
                    else {
                        log::warn!("Skipping link {id}: no destination page");
                        continue;
                    };
                    dictionary! { "S" => "GoTo", "D" => dest }
                }
                Link::Url(url) => dictionary! {
                    "S" => "URI",
                    "URI" => Object::String(url.as_bytes().to_vec(), StringFormat::Literal),
                },
            };
            let rect: Vec<Object> = vec![
                (area.x * k).into(),
                (page_height - (area.y + area.height) * k).into(),
                ((area.x + area.width) * k).into(),
                (page_height - area.y * k).into(),
            ];
            let annot = dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => rect,
                "Border" => vec![0.into(), 0.into(), 0.into()],
                "A" => action,
            };
            annots.push(Object::Reference(pdf.add_object(annot)));
        }
        if !annots.is_empty() {
            annots_by_page.push((page_id, annots));
        }
    }
    for (page_id, annots) in annots_by_page {
        if let Ok(Object::Dictionary(page_dict)) = pdf.get_object_mut(page_id) {
            page_dict.set("Annots", Object::Array(annots));
        }
    }

    if !doc.bookmarks.is_empty() {
        let nodes = build_outline(&doc.bookmarks);
        let ids: Vec<ObjectId> = doc.bookmarks.iter().map(|_| pdf.new_object_id()).collect();
        let root_id = pdf.new_object_id();
        let reference = |index: usize| Object::Reference(ids.get(index).copied().unwrap_or(root_id));

        for (index, (bookmark, node)) in doc.bookmarks.iter().zip(&nodes).enumerate() {
            let mut dict = dictionary! {
                "Title" => Object::String(winlatin_bytes(&bookmark.text), StringFormat::Literal),
                "Parent" => reference(node.parent),
            };
            if let Some(prev) = node.prev {
                dict.set("Prev", reference(prev));
            }
            if let Some(next) = node.next {
                dict.set("Next", reference(next));
            }
            if let (Some(first), Some(last)) = (node.first, node.last) {
                dict.set("First", reference(first));
                dict.set("Last", reference(last));
                dict.set("Count", node.count as i64);
            }
            if let Some(dest) = destination(bookmark.page, bookmark.y) {
                dict.set("Dest", dest);
            }
            pdf.objects.insert(ids[index], dict.into());
        }

        let top_level: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent == nodes.len())
            .map(|(i, _)| i)
            .collect();
        let mut outlines = dictionary! {
            "Type" => "Outlines",
            "Count" => doc.bookmarks.len() as i64,
        };
        if let (Some(first), Some(last)) = (top_level.first(), top_level.last()) {
            outlines.set("First", reference(*first));
            outlines.set("Last", reference(*last));
        }
        pdf.objects.insert(root_id, outlines.into());

        let catalog_id = pdf.trailer.get(b"Root")?.as_reference()?;
        if let Ok(Object::Dictionary(catalog)) = pdf.get_object_mut(catalog_id) {
            catalog.set("Outlines", root_id);
            catalog.set("PageMode", "UseOutlines");
        }
        log::debug!("outline written with {} bookmarks", doc.bookmarks.len());
    }

    let mut out = Vec::new();
    pdf.save_to(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentConfig;

    #[test]
    fn render_empty_document() {
        let mut doc = PdfDocument::new(DocumentConfig::default());
        let bytes = doc.output().unwrap();
        assert!(bytes.len() > 100, "PDF should have content");
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn winlatin_maps_typographic_characters() {
        assert_eq!(winlatin_bytes("a€…"), vec![b'a', 0x80, 0x85]);
        assert_eq!(winlatin_bytes("é"), vec![0xE9]);
        assert_eq!(winlatin_bytes("漢"), vec![b'?']);
    }

    #[test]
    fn text_operands_are_reencoded() {
        let mut pdf = lopdf::Document::with_version("1.7");
        let pages_id = pdf.new_object_id();
        let content = Content {
            operations: vec![
                lopdf::content::Operation::new("BT", vec![]),
                lopdf::content::Operation::new(
                    "Tj",
                    vec![Object::String("Grüße €".as_bytes().to_vec(), StringFormat::Literal)],
                ),
                lopdf::content::Operation::new("ET", vec![]),
            ],
        };
        let content_id = pdf.add_object(lopdf::Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => content_id,
        });
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1_i64,
            }),
        );
        let catalog_id = pdf.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        pdf.trailer.set("Root", catalog_id);

        encode_page_text(&mut pdf).unwrap();
        let decoded = Content::decode(&pdf.get_page_content(page_id).unwrap()).unwrap();
        let operand = decoded.operations[1].operands[0].as_str().unwrap();
        assert_eq!(operand, &[b'G', b'r', 0xFC, 0xDF, b'e', b' ', 0x80]);
    }

    #[test]
    fn latin_text_renders() {
        let mut doc = PdfDocument::new(DocumentConfig::default());
        doc.add_page();
        doc.text(10.0, 10.0, "Café – 5 €");
        let bytes = doc.output().unwrap();
        assert!(lopdf::Document::load_mem(&bytes).is_ok());
    }

    #[test]
    fn builtin_font_variants() {
        let times = Font::default().with_name(FontName::Times).bold().italic();
        assert!(matches!(builtin_font(&times), BuiltinFont::TimesBoldItalic));
        assert!(matches!(
            builtin_font(&Font::default().italic()),
            BuiltinFont::HelveticaOblique
        ));
    }

    #[test]
    fn data_uri_errors() {
        assert!(load_image_bytes("data:image/png,abc").is_err());
        assert!(matches!(
            load_image_bytes("/definitely/missing.png"),
            Err(PdfError::ImageNotFound(_))
        ));
        assert_eq!(load_image_bytes("data:image/png;base64,AQID").unwrap(), vec![1, 2, 3]);
    }
}
