pub mod api;
pub mod billing;
pub mod calendar;
pub mod core;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use billing::{compute_billing, BillingInputs, BillingSummary};
pub use core::{CoreError, CoreResult, VenueConfig};
pub use models::{Booking, BookingInput, Expense, ExpenseInput, User};
pub use pdf::{layout_invoice, render, InvoiceDocument};
pub use pipeline::{generate_invoice, upload_attachments, AttachmentFile};
pub use storage::DriveClient;
