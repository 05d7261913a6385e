//! Persistence for products and the sale log.
//!
//! [`Store`] is the seam between the services and the backing database.
//! [`PgStore`] talks to Postgres through sea-orm; [`MemoryStore`] keeps
//! everything in process and backs local runs without a database and the
//! test suite.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Product, Sale},
    routes::params::{ProductSortBy, SortOrder},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: ProductSortBy,
    pub sort_order: SortOrder,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    pub product_id: Option<Uuid>,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub description: String,
    pub images: Vec<String>,
    pub seller_name: Option<String>,
    pub seller_phone: Option<String>,
}

/// Partial product update; `None` leaves the field as it is. For the
/// nullable seller fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub seller_name: Option<Option<String>>,
    pub seller_phone: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub product_id: Uuid,
    pub quantity: i32,
    pub buyer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommittedSale {
    pub sale: Sale,
    pub remaining_stock: i32,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Short name of the backend, reported by the health check.
    fn backend(&self) -> &'static str;

    async fn list_products(&self, filter: &ProductFilter) -> AppResult<Page<Product>>;

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>>;

    async fn create_product(&self, product: NewProduct) -> AppResult<Product>;

    /// Returns `None` when no product has this id.
    async fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> AppResult<Option<Product>>;

    /// Returns whether a product was deleted.
    async fn delete_product(&self, id: Uuid) -> AppResult<bool>;

    /// Decrements stock and appends the sale as one atomic unit.
    ///
    /// The decrement only applies while `stock >= quantity` at commit time,
    /// so concurrent sales of the same product never oversell. Fails with
    /// `NotFound`, `InsufficientStock`, `Contention` or a storage error; on
    /// any failure neither write persists.
    async fn commit_sale(&self, sale: NewSale) -> AppResult<CommittedSale>;

    /// Newest sales first.
    async fn list_sales(&self, filter: &SaleFilter) -> AppResult<Page<Sale>>;
}
