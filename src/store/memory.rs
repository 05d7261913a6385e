use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{
    CommittedSale, NewProduct, NewSale, Page, ProductChanges, ProductFilter, SaleFilter, Store,
};
use crate::{
    error::{AppError, AppResult},
    models::{Product, Sale},
    routes::params::{ProductSortBy, SortOrder},
};

#[derive(Default)]
struct Inventory {
    // insertion order, so ties on the sort column keep creation order
    products: Vec<Product>,
    sales: Vec<Sale>,
}

/// In-process store. One mutex covers products and sales, so a sale's
/// check, decrement and append happen as one step.
pub struct MemoryStore {
    inventory: Mutex<Inventory>,
    lock_timeout: Duration,
    fail_sale_inserts: AtomicBool,
}

impl MemoryStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            inventory: Mutex::new(Inventory::default()),
            lock_timeout,
            fail_sale_inserts: AtomicBool::new(false),
        }
    }

    /// Makes subsequent sale inserts fail with a storage error, to exercise
    /// the rollback path.
    pub fn fail_sale_inserts(&self, fail: bool) {
        self.fail_sale_inserts.store(fail, Ordering::SeqCst);
    }

    async fn lock(&self) -> AppResult<MutexGuard<'_, Inventory>> {
        tokio::time::timeout(self.lock_timeout, self.inventory.lock())
            .await
            .map_err(|_| AppError::Contention)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_products(&self, filter: &ProductFilter) -> AppResult<Page<Product>> {
        let inventory = self.lock().await?;
        let search = filter
            .search
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase());

        let mut matching: Vec<&Product> = inventory
            .products
            .iter()
            .filter(|p| match &search {
                Some(needle) => {
                    p.name.to_lowercase().contains(needle)
                        || p.description.to_lowercase().contains(needle)
                }
                None => true,
            })
            .filter(|p| filter.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| filter.max_price.is_none_or(|max| p.price <= max))
            .collect();

        matching.sort_by(|a, b| {
            let ord = match filter.sort_by {
                ProductSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                ProductSortBy::Price => a.price.total_cmp(&b.price),
                ProductSortBy::Name => a.name.cmp(&b.name),
            };
            match filter.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let total = matching.len() as i64;
        let items = paginate(matching, filter.offset, filter.limit);
        Ok(Page { items, total })
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let inventory = self.lock().await?;
        Ok(inventory.products.iter().find(|p| p.id == id).cloned())
    }

    async fn create_product(&self, product: NewProduct) -> AppResult<Product> {
        let mut inventory = self.lock().await?;
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            stock: product.stock,
            description: product.description,
            images: product.images,
            seller_name: product.seller_name,
            seller_phone: product.seller_phone,
            created_at: Utc::now(),
        };
        inventory.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> AppResult<Option<Product>> {
        let mut inventory = self.lock().await?;
        let product = match inventory.products.iter_mut().find(|p| p.id == id) {
            Some(p) => p,
            None => return Ok(None),
        };

        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(images) = changes.images {
            product.images = images;
        }
        if let Some(seller_name) = changes.seller_name {
            product.seller_name = seller_name;
        }
        if let Some(seller_phone) = changes.seller_phone {
            product.seller_phone = seller_phone;
        }

        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<bool> {
        let mut inventory = self.lock().await?;
        let before = inventory.products.len();
        inventory.products.retain(|p| p.id != id);
        Ok(inventory.products.len() < before)
    }

    async fn commit_sale(&self, sale: NewSale) -> AppResult<CommittedSale> {
        let mut inventory = self.lock().await?;

        let index = inventory
            .products
            .iter()
            .position(|p| p.id == sale.product_id)
            .ok_or(AppError::NotFound("Product"))?;

        let available = inventory.products[index].stock;
        if available < sale.quantity {
            return Err(AppError::InsufficientStock {
                requested: sale.quantity,
                available,
            });
        }

        // The append is checked before the decrement is applied, so a failed
        // insert leaves stock as it was.
        if self.fail_sale_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Storage("sale log rejected the insert".into()));
        }

        let record = Sale {
            id: Uuid::new_v4(),
            product_id: sale.product_id,
            quantity: sale.quantity,
            buyer: sale.buyer,
            date: Utc::now(),
        };

        let remaining_stock = available - sale.quantity;
        inventory.products[index].stock = remaining_stock;
        inventory.sales.push(record.clone());

        Ok(CommittedSale {
            sale: record,
            remaining_stock,
        })
    }

    async fn list_sales(&self, filter: &SaleFilter) -> AppResult<Page<Sale>> {
        let inventory = self.lock().await?;

        // the log is append-only, so reverse insertion order is newest first
        let matching: Vec<&Sale> = inventory
            .sales
            .iter()
            .rev()
            .filter(|s| filter.product_id.is_none_or(|id| s.product_id == id))
            .collect();

        let total = matching.len() as i64;
        let items = paginate(matching, filter.offset, filter.limit);
        Ok(Page { items, total })
    }
}

fn paginate<T: Clone>(items: Vec<&T>, offset: u64, limit: u64) -> Vec<T> {
    items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}
