use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::ApiState;
use crate::models::{Booking, BookingInput};
use crate::pipeline::generate_invoice;
use crate::store;
use crate::store::bookings::BookingQuery;

pub async fn add_new_booking(
    data: web::Json<BookingInput>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let mut booking = Booking::create(data.into_inner())?;
    store::bookings::insert(&state.db, &booking).await?;
    tracing::info!(booking_id = %booking.id, name = %booking.name, "booking created");

    let bill_url = attach_invoice(&state, &mut booking).await;
    Ok(HttpResponse::Created().json(json!({
        "booking": booking,
        "gstBillUrl": bill_url,
    })))
}

pub async fn update_booking(
    path: web::Path<String>,
    data: web::Json<BookingInput>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let stored = store::bookings::find(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    let mut booking = stored.apply_update(data.into_inner())?;
    store::bookings::update(&state.db, &booking).await?;
    tracing::info!(booking_id = %booking.id, "booking updated");

    // Regenerate the bill for the revised amounts. A failure keeps the
    // previous link, so the caller still gets a usable URL if one exists.
    attach_invoice(&state, &mut booking).await;
    let bill_url = booking.gst_bill_url.clone();
    Ok(HttpResponse::Ok().json(json!({
        "message": "Booking updated successfully",
        "booking": booking,
        "gstBillUrl": bill_url,
    })))
}

pub async fn bookings_list(
    query: web::Query<BookingQuery>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let page = store::bookings::search(&state.db, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn delete_booking(
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !store::bookings::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Booking not found"));
    }
    tracing::info!(booking_id = %id, "booking deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Booking deleted successfully" })))
}

/// Draws the next invoice number, generates and uploads the bill, and
/// records the share link. Storage trouble never fails the request; the
/// booking stays saved and the caller sees a null URL.
async fn attach_invoice(state: &ApiState, booking: &mut Booking) -> Option<String> {
    let sequence =
        match store::counters::next_value(&state.db, store::counters::INVOICE_COUNTER).await {
            Ok(sequence) => sequence,
            Err(e) => {
                tracing::warn!(booking_id = %booking.id, error = %e, "invoice sequence unavailable");
                state.metrics.invoice_failures.inc();
                return None;
            }
        };

    match generate_invoice(&state.drive, &state.config.venue, booking, sequence).await {
        Ok(url) => {
            booking.gst_bill_url = Some(url.clone());
            booking.updated_at = Utc::now();
            if let Err(e) =
                store::bookings::set_invoice_url(&state.db, &booking.id, &url, booking.updated_at)
                    .await
            {
                tracing::warn!(booking_id = %booking.id, error = %e, "invoice link not persisted");
            }
            state.metrics.invoices_generated.inc();
            Some(url)
        }
        Err(e) => {
            tracing::warn!(
                booking_id = %booking.id,
                error = %e,
                "invoice generation failed, booking saved without bill"
            );
            state.metrics.invoice_failures.inc();
            None
        }
    }
}
