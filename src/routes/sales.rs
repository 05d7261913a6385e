use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::{
    dto::sales::{RecordSaleRequest, SaleList},
    error::AppResult,
    middleware::extract::{ApiJson, ApiQuery},
    models::Sale,
    response::{ApiResponse, ErrorBody},
    routes::params::SaleQuery,
    services::sale_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_sales).post(record_sale))
}

#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = RecordSaleRequest,
    responses(
        (status = 201, description = "Sale recorded and stock decremented", body = ApiResponse<Sale>),
        (status = 400, description = "Missing or invalid productId / quantity", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 409, description = "Insufficient stock or concurrent update", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
    tag = "Sales"
)]
pub async fn record_sale(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RecordSaleRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Sale>>)> {
    let resp = sale_service::record_sale(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/sales",
    params(SaleQuery),
    responses(
        (status = 200, description = "List sales, newest first", body = ApiResponse<SaleList>),
        (status = 400, description = "Invalid query", body = ErrorBody),
    ),
    tag = "Sales"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SaleQuery>,
) -> AppResult<Json<ApiResponse<SaleList>>> {
    let resp = sale_service::list_sales(&state, query).await?;
    Ok(Json(resp))
}
