use uuid::Uuid;

use crate::{
    dto::sales::{RecordSaleRequest, SaleList},
    error::{AppError, AppResult},
    models::Sale,
    response::{ApiResponse, Meta},
    routes::params::SaleQuery,
    state::AppState,
    store::{NewSale, SaleFilter},
};

/// Records a sale: validate, fetch the product, check stock, then decrement
/// stock and append the sale atomically.
///
/// Not idempotent; every call that succeeds is a new sale.
pub async fn record_sale(
    state: &AppState,
    payload: RecordSaleRequest,
) -> AppResult<ApiResponse<Sale>> {
    let (product_id, quantity) = validate_sale(&payload)?;
    let buyer = payload
        .buyer
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty());

    let product = state.store.get_product(product_id).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound("Product")),
    };

    if product.stock < quantity {
        tracing::warn!(
            product_id = %product_id,
            requested = quantity,
            available = product.stock,
            "sale rejected: insufficient stock"
        );
        return Err(AppError::InsufficientStock {
            requested: quantity,
            available: product.stock,
        });
    }

    // The store re-checks stock when it commits; a concurrent sale may have
    // taken it since the read above.
    let committed = state
        .store
        .commit_sale(NewSale {
            product_id,
            quantity,
            buyer,
        })
        .await
        .inspect_err(|err| {
            tracing::warn!(product_id = %product_id, quantity, error = %err, "sale not committed");
        })?;

    tracing::info!(
        sale_id = %committed.sale.id,
        product_id = %product_id,
        quantity,
        remaining_stock = committed.remaining_stock,
        "sale recorded"
    );

    Ok(ApiResponse::ok("Sale recorded", committed.sale))
}

pub async fn list_sales(state: &AppState, query: SaleQuery) -> AppResult<ApiResponse<SaleList>> {
    let (page, limit, offset) = query.pagination().normalize()?;
    let filter = SaleFilter {
        product_id: query.product_id,
        limit: limit as u64,
        offset,
    };

    let result = state.store.list_sales(&filter).await?;

    let meta = Meta::new(page, limit, result.total);
    Ok(ApiResponse::paged(
        "Sales",
        SaleList {
            items: result.items,
        },
        meta,
    ))
}

fn validate_sale(payload: &RecordSaleRequest) -> AppResult<(Uuid, i32)> {
    let (product_id, quantity) = match (payload.product_id, payload.quantity) {
        (Some(product_id), Some(quantity)) => (product_id, quantity),
        _ => {
            return Err(AppError::BadRequest(
                "productId and quantity required".into(),
            ));
        }
    };

    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be a positive integer".into(),
        ));
    }
    let quantity = i32::try_from(quantity)
        .map_err(|_| AppError::BadRequest("quantity is too large".into()))?;

    Ok((product_id, quantity))
}
