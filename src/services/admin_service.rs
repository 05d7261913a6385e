use crate::{
    dto::{Acknowledged, admin::AdminLoginRequest},
    error::{AppError, AppResult},
    response::ApiResponse,
    state::AppState,
};

/// Plain password equality against the configured admin password.
pub async fn login(
    state: &AppState,
    payload: AdminLoginRequest,
) -> AppResult<ApiResponse<Acknowledged>> {
    let expected = match state.config.admin_password.as_deref() {
        Some(p) => p,
        None => return Err(AppError::Misconfigured("Admin password not configured")),
    };

    if payload.password.as_deref() != Some(expected) {
        tracing::warn!("admin login rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(ApiResponse::ok("Logged in", Acknowledged { success: true }))
}
