use actix_web::{web, HttpResponse};

use crate::api::error::ApiResult;
use crate::api::state::ApiState;

pub async fn hijri_calendar(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let calendar = state.hijri.upcoming_year().await?;
    Ok(HttpResponse::Ok().json(calendar))
}

pub async fn indian_holidays(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let holidays = state.holidays.upcoming_year().await?;
    Ok(HttpResponse::Ok().json(holidays))
}
