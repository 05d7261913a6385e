use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        Acknowledged,
        admin::AdminLoginRequest,
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        sales::{RecordSaleRequest, SaleList},
    },
    models::{Product, Sale},
    response::{ApiResponse, ErrorBody, Meta},
    routes::{admin, health, params, products, sales},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        sales::record_sale,
        sales::list_sales,
        admin::login
    ),
    components(
        schemas(
            Product,
            Sale,
            CreateProductRequest,
            UpdateProductRequest,
            RecordSaleRequest,
            AdminLoginRequest,
            ProductList,
            SaleList,
            Acknowledged,
            ErrorBody,
            health::HealthData,
            params::SortOrder,
            params::ProductSortBy,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Sale>,
            ApiResponse<SaleList>,
            ApiResponse<Acknowledged>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalogue"),
        (name = "Sales", description = "Stock-decrementing sales"),
        (name = "Admin", description = "Admin password check"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
