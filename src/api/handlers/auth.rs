use actix_web::{web, HttpResponse};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::auth::issue_token;
use crate::api::state::ApiState;
use crate::models::{LoginRequest, LoginResponse, UserProfile};
use crate::store;

pub async fn login(
    data: web::Json<LoginRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let user = store::users::find_by_user_name(&state.db, data.username.trim())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let password_matches = bcrypt::verify(&data.password, &user.password_hash)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;
    if !password_matches {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = issue_token(&user, &state.config.jwt_secret)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    tracing::info!(user = %user.user_name, "login succeeded");
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: UserProfile::from(&user),
    }))
}
