use bytes::Bytes;
use chrono::Local;

use crate::core::{CoreResult, VenueConfig};
use crate::models::Booking;
use crate::pdf;
use crate::storage::DriveClient;

pub fn invoice_path(booking_id: &str) -> String {
    format!("/GST_Bill_{booking_id}.pdf")
}

/// Builds the invoice PDF in memory. Pure CPU work with no storage side
/// effects, so it can run and fail independently of the upload.
pub fn build_document(venue: &VenueConfig, booking: &Booking, sequence: i64) -> CoreResult<Vec<u8>> {
    let document = pdf::layout_invoice(venue, booking, sequence, Local::now().date_naive());
    pdf::render(&document)
}

/// Renders, uploads and shares the GST invoice for a booking, returning
/// the direct-view URL. Re-running for the same booking overwrites the
/// stored file and reuses the provider's existing share link.
pub async fn generate_invoice(
    drive: &DriveClient,
    venue: &VenueConfig,
    booking: &Booking,
    sequence: i64,
) -> CoreResult<String> {
    let bytes = build_document(venue, booking, sequence)?;
    let path = invoice_path(&booking.id);
    drive.upload(&path, Bytes::from(bytes)).await?;
    let link = drive.get_or_create_share_link(&path).await?;
    let url = DriveClient::to_direct_view(&link);
    tracing::info!(booking_id = %booking.id, url = %url, "invoice generated and shared");
    Ok(url)
}
