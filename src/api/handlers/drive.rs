use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::ApiState;

/// Starts the OAuth connect flow by sending the operator to the
/// provider's consent page.
pub async fn connect(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, state.drive.authorize_url()))
        .finish())
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Provider redirect target. Exchanges the one-time code and persists
/// the refresh token so invoices can upload from then on.
pub async fn callback(
    query: web::Query<CallbackQuery>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    if let Some(error) = &query.error {
        return Err(ApiError::bad_request(format!(
            "authorization declined: {error}"
        )));
    }
    let code = query
        .code
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("missing authorization code"))?;

    let refresh_token = state.drive.exchange_auth_code(code).await?;
    state.credentials.store_refresh_token(refresh_token).await?;

    tracing::info!("drive account connected");
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Drive connected successfully. You can close this window."))
}
