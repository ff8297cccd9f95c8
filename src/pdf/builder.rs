use crate::core::PageLayout;

use super::document::{DrawOp, InvoiceDocument, Page};

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH_EM: f32 = 0.5;

const TITLE_BAND_HEIGHT: f32 = 8.0;
const ROW_LINE_HEIGHT: f32 = 5.5;
const ROW_PADDING: f32 = 2.5;
const CELL_INSET: f32 = 2.0;
/// Label column share of the content width.
const LABEL_COLUMN_RATIO: f32 = 0.25;

/// One label/value row of an invoice table. `bold` marks the emphasised
/// rows (printed bold on both columns).
#[derive(Debug, Clone)]
pub struct LabeledRow {
    pub label: String,
    pub value: String,
    pub bold: bool,
}

impl LabeledRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        LabeledRow {
            label: label.into(),
            value: value.into(),
            bold: false,
        }
    }

    pub fn emphasised(label: impl Into<String>, value: impl Into<String>) -> Self {
        LabeledRow {
            label: label.into(),
            value: value.into(),
            bold: true,
        }
    }
}

/// Cursor-based layout engine. Content flows top to bottom; anything that
/// would cross the bottom margin moves to a fresh page, so long values can
/// never be clipped off the sheet.
pub struct DocumentBuilder {
    layout: PageLayout,
    title: String,
    pages: Vec<Page>,
    ops: Vec<DrawOp>,
    cursor: f32,
}

impl DocumentBuilder {
    pub fn new(layout: PageLayout, title: impl Into<String>) -> Self {
        let cursor = layout.margin.top;
        DocumentBuilder {
            layout,
            title: title.into(),
            pages: Vec::new(),
            ops: Vec::new(),
            cursor,
        }
    }

    pub fn centered_text(&mut self, text: &str, size: f32, bold: bool) -> &mut Self {
        let line_height = line_height(size);
        self.ensure_room(line_height);
        let width = text_width(text, size);
        let x = ((self.layout.width() - width) / 2.0).max(self.layout.margin.left);
        self.cursor += line_height;
        self.ops.push(DrawOp::Text {
            x,
            y: self.cursor,
            size,
            bold,
            content: text.to_string(),
        });
        self
    }

    pub fn text_line(&mut self, text: &str, size: f32, bold: bool) -> &mut Self {
        let line_height = line_height(size);
        self.ensure_room(line_height);
        self.cursor += line_height;
        self.ops.push(DrawOp::Text {
            x: self.layout.margin.left,
            y: self.cursor,
            size,
            bold,
            content: text.to_string(),
        });
        self
    }

    pub fn divider(&mut self) -> &mut Self {
        self.ensure_room(2.0);
        self.cursor += 2.0;
        self.ops.push(DrawOp::Line {
            x1: self.layout.margin.left,
            y1: self.cursor,
            x2: self.layout.width() - self.layout.margin.right,
            y2: self.cursor,
        });
        self
    }

    pub fn vspace(&mut self, mm: f32) -> &mut Self {
        self.cursor += mm;
        self
    }

    /// A titled two-column table: shaded title band, then label/value rows.
    /// The band always stays attached to at least the first row.
    pub fn table(&mut self, title: &str, rows: &[LabeledRow]) -> &mut Self {
        let first_row_height = rows
            .first()
            .map(|r| self.row_height(r))
            .unwrap_or(ROW_LINE_HEIGHT + ROW_PADDING);
        self.ensure_room(TITLE_BAND_HEIGHT + first_row_height);
        self.title_band(title);

        for row in rows {
            let height = self.row_height(row);
            self.ensure_room(height);
            self.draw_row(row, height);
        }
        self.vspace(4.0)
    }

    /// Small-print block at the bottom of the document.
    pub fn note_block(&mut self, lines: &[String]) -> &mut Self {
        let size = 8.5;
        let width = self.layout.content_width();
        for line in lines {
            for wrapped in wrap_text(line, width, size) {
                self.text_line(&wrapped, size, false);
            }
        }
        self
    }

    pub fn finish(mut self) -> InvoiceDocument {
        self.pages.push(Page {
            ops: std::mem::take(&mut self.ops),
        });
        InvoiceDocument {
            title: self.title,
            width_mm: self.layout.width(),
            height_mm: self.layout.height(),
            pages: self.pages,
        }
    }

    fn title_band(&mut self, title: &str) {
        let left = self.layout.margin.left;
        self.ops.push(DrawOp::Rect {
            x: left,
            y: self.cursor,
            w: self.layout.content_width(),
            h: TITLE_BAND_HEIGHT,
            shaded: true,
        });
        self.ops.push(DrawOp::Text {
            x: left + CELL_INSET,
            y: self.cursor + TITLE_BAND_HEIGHT - 2.5,
            size: 11.0,
            bold: true,
            content: title.to_string(),
        });
        self.cursor += TITLE_BAND_HEIGHT;
    }

    fn row_height(&self, row: &LabeledRow) -> f32 {
        let lines = wrap_text(&row.value, self.value_column_width(), 10.0).len().max(1);
        ROW_PADDING + lines as f32 * ROW_LINE_HEIGHT
    }

    fn draw_row(&mut self, row: &LabeledRow, height: f32) {
        let left = self.layout.margin.left;
        let value_x = left + self.label_column_width() + CELL_INSET;
        let baseline = self.cursor + ROW_PADDING / 2.0 + ROW_LINE_HEIGHT - 1.0;

        self.ops.push(DrawOp::Text {
            x: left + CELL_INSET,
            y: baseline,
            size: 10.0,
            bold: row.bold,
            content: row.label.clone(),
        });
        for (i, line) in wrap_text(&row.value, self.value_column_width(), 10.0)
            .into_iter()
            .enumerate()
        {
            self.ops.push(DrawOp::Text {
                x: value_x,
                y: baseline + i as f32 * ROW_LINE_HEIGHT,
                size: 10.0,
                bold: row.bold,
                content: line,
            });
        }

        self.cursor += height;
        self.ops.push(DrawOp::Line {
            x1: left,
            y1: self.cursor,
            x2: self.layout.width() - self.layout.margin.right,
            y2: self.cursor,
        });
    }

    fn label_column_width(&self) -> f32 {
        self.layout.content_width() * LABEL_COLUMN_RATIO
    }

    fn value_column_width(&self) -> f32 {
        self.layout.content_width() - self.label_column_width() - 2.0 * CELL_INSET
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.cursor + needed > self.layout.height() - self.layout.margin.bottom {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        self.pages.push(Page {
            ops: std::mem::take(&mut self.ops),
        });
        self.cursor = self.layout.margin.top;
    }
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.45
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * PT_TO_MM * GLYPH_WIDTH_EM
}

/// Greedy word wrap against an estimated Helvetica advance width. Words
/// longer than a full line are hard-split.
fn wrap_text(text: &str, max_width_mm: f32, size: f32) -> Vec<String> {
    let max_chars = ((max_width_mm / (size * PT_TO_MM * GLYPH_WIDTH_EM)) as usize).max(8);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            let split: String = word.chars().take(max_chars).collect();
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(split.clone());
            word = &word[split.len()..];
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
