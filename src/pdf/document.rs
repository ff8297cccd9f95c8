use serde::{Deserialize, Serialize};

/// One drawing instruction on a page. Coordinates are millimetres from the
/// top-left corner; the serializer flips the axis for PDF space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        content: String,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        shaded: bool,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Fully laid-out document, ready to serialize. Immutable once built; the
/// text ops double as the testable record of what the invoice says.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub title: String,
    pub width_mm: f32,
    pub height_mm: f32,
    pub pages: Vec<Page>,
}

impl InvoiceDocument {
    /// All text runs across every page, in draw order.
    pub fn text_runs(&self) -> impl Iterator<Item = &DrawOp> {
        self.pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .filter(|op| matches!(op, DrawOp::Text { .. }))
    }

    /// The document's text content joined with newlines, for assertions
    /// and debugging.
    pub fn plain_text(&self) -> String {
        self.text_runs()
            .filter_map(|op| match op {
                DrawOp::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.text_runs().any(|op| match op {
            DrawOp::Text { content, .. } => content.contains(needle),
            _ => false,
        })
    }

    /// Finds the first text run containing `needle`, with its boldness.
    pub fn find_text(&self, needle: &str) -> Option<(&str, bool)> {
        self.text_runs().find_map(|op| match op {
            DrawOp::Text { content, bold, .. } if content.contains(needle) => {
                Some((content.as_str(), *bold))
            }
            _ => None,
        })
    }
}
