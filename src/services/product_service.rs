use uuid::Uuid;

use crate::{
    dto::{
        Acknowledged,
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
    },
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
    store::{NewProduct, ProductChanges, ProductFilter},
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize()?;

    let filter = ProductFilter {
        search: query.q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
        min_price: query.min_price,
        max_price: query.max_price,
        sort_by: query.sort_by.unwrap_or_default(),
        sort_order: query.sort_order.unwrap_or_default(),
        limit: limit as u64,
        offset,
    };

    let result = state.store.list_products(&filter).await?;

    let meta = Meta::new(page, limit, result.total);
    let data = ProductList {
        items: result.items,
    };
    Ok(ApiResponse::paged("Products", data, meta))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let result = state.store.get_product(id).await?;
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound("Product")),
    };
    Ok(ApiResponse::ok("Product", result))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let name = match payload.name.map(|n| n.trim().to_string()) {
        Some(name) if !name.is_empty() => name,
        _ => return Err(AppError::BadRequest("Missing name".into())),
    };
    let price = payload.price.unwrap_or(0.0);
    let stock = payload.stock.unwrap_or(0);
    validate_price(price)?;
    validate_stock(stock)?;

    let product = state
        .store
        .create_product(NewProduct {
            name,
            price,
            stock,
            description: payload.description.unwrap_or_default(),
            images: payload.images.unwrap_or_default(),
            seller_name: payload.seller_name,
            seller_phone: payload.seller_phone,
        })
        .await?;

    tracing::info!(product_id = %product.id, stock = product.stock, "product created");

    Ok(ApiResponse::ok("Product created", product))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let name = match payload.name.map(|n| n.trim().to_string()) {
        Some(name) if name.is_empty() => {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        other => other,
    };
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(stock) = payload.stock {
        validate_stock(stock)?;
    }

    let changes = ProductChanges {
        name,
        price: payload.price,
        stock: payload.stock,
        description: payload.description,
        images: payload.images,
        seller_name: payload.seller_name,
        seller_phone: payload.seller_phone,
    };

    let product = state.store.update_product(id, changes).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound("Product")),
    };

    tracing::info!(product_id = %product.id, "product updated");

    Ok(ApiResponse::ok("Updated", product))
}

pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Acknowledged>> {
    let deleted = state.store.delete_product(id).await?;

    if !deleted {
        return Err(AppError::NotFound("Product"));
    }

    tracing::info!(product_id = %id, "product deleted");

    Ok(ApiResponse::ok("Deleted", Acknowledged { success: true }))
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest(
            "price must be a non-negative number".into(),
        ));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    Ok(())
}
