use std::io::BufWriter;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{BuiltinFont, Color, Line, Mm, PdfDocument, Point, Polygon, Rgb};

use crate::core::{CoreError, CoreResult};

use super::document::{DrawOp, InvoiceDocument};

const BAND_SHADE: f32 = 0.92;
const RULE_SHADE: f32 = 0.6;

/// Serializes a laid-out document to PDF bytes with the builtin Helvetica
/// pair. Any failure here is fatal to the generation call.
pub fn render(document: &InvoiceDocument) -> CoreResult<Vec<u8>> {
    let width = document.width_mm;
    let height = document.height_mm;

    let (doc, first_page, first_layer) =
        PdfDocument::new(document.title.as_str(), Mm(width), Mm(height), "content");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(to_serialization)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(to_serialization)?;

    for (index, page) in document.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(Mm(width), Mm(height), "content");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for op in &page.ops {
            match op {
                DrawOp::Text { x, y, size, bold: emphasised, content } => {
                    let font = if *emphasised { &bold } else { &regular };
                    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
                    layer.use_text(winansi_text(content), *size, Mm(*x), Mm(height - *y), font);
                }
                DrawOp::Rect { x, y, w, h, shaded } => {
                    let ring = vec![
                        (Point::new(Mm(*x), Mm(height - *y)), false),
                        (Point::new(Mm(*x + *w), Mm(height - *y)), false),
                        (Point::new(Mm(*x + *w), Mm(height - *y - *h)), false),
                        (Point::new(Mm(*x), Mm(height - *y - *h)), false),
                    ];
                    let mode = if *shaded {
                        layer.set_fill_color(Color::Rgb(Rgb::new(
                            BAND_SHADE, BAND_SHADE, BAND_SHADE, None,
                        )));
                        PaintMode::Fill
                    } else {
                        layer.set_outline_color(Color::Rgb(Rgb::new(
                            RULE_SHADE, RULE_SHADE, RULE_SHADE, None,
                        )));
                        layer.set_outline_thickness(0.4);
                        PaintMode::Stroke
                    };
                    layer.add_polygon(Polygon {
                        rings: vec![ring],
                        mode,
                        winding_order: WindingOrder::NonZero,
                    });
                }
                DrawOp::Line { x1, y1, x2, y2 } => {
                    layer.set_outline_color(Color::Rgb(Rgb::new(
                        RULE_SHADE, RULE_SHADE, RULE_SHADE, None,
                    )));
                    layer.set_outline_thickness(0.3);
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(*x1), Mm(height - *y1)), false),
                            (Point::new(Mm(*x2), Mm(height - *y2)), false),
                        ],
                        is_closed: false,
                    });
                }
            }
        }
    }

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer).map_err(to_serialization)?;
    writer
        .into_inner()
        .map_err(|e| CoreError::Serialization(e.to_string()))
}

/// The builtin fonts carry WinAnsi encoding, which has no rupee glyph;
/// amounts fall back to an "Rs" prefix on paper while the document
/// model keeps the real sign.
fn winansi_text(text: &str) -> String {
    text.replace('₹', "Rs ")
        .chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

fn to_serialization(err: impl std::fmt::Display) -> CoreError {
    CoreError::Serialization(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PageLayout;
    use crate::pdf::builder::{DocumentBuilder, LabeledRow};

    fn small_document(rows: usize) -> InvoiceDocument {
        let mut builder = DocumentBuilder::new(PageLayout::default(), "render test");
        builder.centered_text("Heading", 14.0, true);
        let rows: Vec<LabeledRow> = (0..rows)
            .map(|i| LabeledRow::new(format!("Label {i}"), format!("₹{i}.00")))
            .collect();
        builder.table("Table", &rows);
        builder.finish()
    }

    #[test]
    fn produces_a_pdf_header() {
        let bytes = render(&small_document(4)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn extra_pages_grow_the_output() {
        let one_page = render(&small_document(4)).unwrap();
        let doc = small_document(80);
        assert!(doc.pages.len() > 1);
        let two_pages = render(&doc).unwrap();
        assert!(two_pages.len() > one_page.len());
    }

    #[test]
    fn rupee_sign_maps_to_an_ansi_fallback() {
        assert_eq!(winansi_text("₹1234.00"), "Rs 1234.00");
        assert_eq!(winansi_text("Total ₹0.50"), "Total Rs 0.50");
    }

    #[test]
    fn non_ansi_characters_degrade_to_placeholders() {
        assert_eq!(winansi_text("café"), "café");
        assert_eq!(winansi_text("नमस्ते"), "??????");
    }
}
