pub mod attachments;
pub mod invoice;

pub use attachments::{upload_attachments, AttachmentFile};
pub use invoice::{build_document, generate_invoice, invoice_path};
