use axum::{Json, Router, extract::OriginalUri, http::StatusCode};

use crate::{response::ErrorBody, state::AppState};

pub mod admin;
pub mod doc;
pub mod health;
pub mod params;
pub mod products;
pub mod sales;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/sales", sales::router())
        .nest("/admin", admin::router())
        .fallback(not_found)
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<ErrorBody>) {
    let body = ErrorBody {
        error: format!("No route for {}", uri.path()),
    };
    (StatusCode::NOT_FOUND, Json(body))
}
