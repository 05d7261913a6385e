use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::{Acknowledged, admin::AdminLoginRequest},
    error::AppResult,
    middleware::extract::ApiJson,
    response::{ApiResponse, ErrorBody},
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Password accepted", body = ApiResponse<Acknowledged>),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Admin password not configured", body = ErrorBody),
    ),
    tag = "Admin"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AdminLoginRequest>,
) -> AppResult<Json<ApiResponse<Acknowledged>>> {
    let resp = admin_service::login(&state, payload).await?;
    Ok(Json(resp))
}
