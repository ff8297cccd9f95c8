use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use serde_json::json;
use sqlx::types::Json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::ApiState;
use crate::models::{Expense, ExpenseInput};
use crate::pipeline::{upload_attachments, AttachmentFile};
use crate::store;

/// Multipart intake: text fields describe the expense, file fields under
/// `images` are receipt scans. Fields are validated before any upload so
/// a bad form never leaves stray files in the drive.
pub async fn add_new_expense(
    mut payload: Multipart,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let mut input = ExpenseInput::default();
    let mut files: Vec<AttachmentFile> = Vec::new();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().to_string();
        let file_name = field
            .content_disposition()
            .get_filename()
            .map(|s| s.to_string());

        let mut bytes = web::BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            if bytes.len() + chunk.len() > state.config.max_upload_size_bytes {
                return Err(ApiError::bad_request("receipt file too large"));
            }
            bytes.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) => files.push(AttachmentFile {
                file_name,
                bytes: bytes.freeze(),
            }),
            None => input.set_field(&name, String::from_utf8_lossy(&bytes).trim().to_string()),
        }
    }

    let mut expense = Expense::create(input, Vec::new())?;
    let urls = upload_attachments(&state.drive, &files).await?;
    state.metrics.receipts_uploaded.inc_by(urls.len() as u64);
    expense.receipt_urls = Json(urls);

    store::expenses::insert(&state.db, &expense).await?;
    tracing::info!(expense_id = %expense.id, receipts = expense.receipt_urls.0.len(), "expense recorded");
    Ok(HttpResponse::Created().json(json!({ "expense": expense })))
}

pub async fn expenses_all_list(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let expenses = store::expenses::list_all(&state.db).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "expenses": expenses })))
}

pub async fn delete_expense(
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !store::expenses::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Expense not found"));
    }
    tracing::info!(expense_id = %id, "expense deleted");
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Expense deleted" })))
}
