pub mod builder;
pub mod document;
pub mod invoice;
pub mod render;

pub use builder::{DocumentBuilder, LabeledRow};
pub use document::{DrawOp, InvoiceDocument, Page};
pub use invoice::{format_inr, invoice_number, layout_invoice};
pub use render::render;
