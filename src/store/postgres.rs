use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use super::{
    CommittedSale, NewProduct, NewSale, Page, ProductChanges, ProductFilter, SaleFilter, Store,
};
use crate::{
    entity::{
        products::{
            ActiveModel as ProductActive, Column as ProdCol, Entity as Products,
            Model as ProductModel,
        },
        sales::{ActiveModel as SaleActive, Column as SaleCol, Entity as Sales, Model as SaleModel},
    },
    error::{AppError, AppResult},
    models::{Product, Sale},
    routes::params::{ProductSortBy, SortOrder},
};

#[derive(Clone)]
pub struct PgStore {
    orm: DatabaseConnection,
    lock_timeout: Duration,
}

impl PgStore {
    pub fn new(orm: DatabaseConnection, lock_timeout: Duration) -> Self {
        Self { orm, lock_timeout }
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list_products(&self, filter: &ProductFilter) -> AppResult<Page<Product>> {
        let mut condition = Condition::all();

        if let Some(search) = filter.search.as_ref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(ProdCol::Name).ilike(pattern.clone()))
                    .add(Expr::col(ProdCol::Description).ilike(pattern)),
            );
        }

        if let Some(min_price) = filter.min_price {
            condition = condition.add(ProdCol::Price.gte(min_price));
        }

        if let Some(max_price) = filter.max_price {
            condition = condition.add(ProdCol::Price.lte(max_price));
        }

        let sort_col = match filter.sort_by {
            ProductSortBy::CreatedAt => ProdCol::CreatedAt,
            ProductSortBy::Price => ProdCol::Price,
            ProductSortBy::Name => ProdCol::Name,
        };

        let mut finder = Products::find().filter(condition);
        finder = match filter.sort_order {
            SortOrder::Asc => finder.order_by_asc(sort_col),
            SortOrder::Desc => finder.order_by_desc(sort_col),
        };
        // stable pages when the sort column ties
        finder = finder.order_by_asc(ProdCol::Id);

        let total = finder.clone().count(&self.orm).await? as i64;

        let items = finder
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();

        Ok(Page { items, total })
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let product = Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity);
        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> AppResult<Product> {
        let active = ProductActive {
            id: Set(Uuid::new_v4()),
            name: Set(product.name),
            price: Set(product.price),
            stock: Set(product.stock),
            description: Set(product.description),
            images: Set(product.images),
            seller_name: Set(product.seller_name),
            seller_phone: Set(product.seller_phone),
            created_at: NotSet,
        };
        let product = active.insert(&self.orm).await?;
        Ok(product_from_entity(product))
    }

    async fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> AppResult<Option<Product>> {
        let existing = Products::find_by_id(id).one(&self.orm).await?;
        let existing = match existing {
            Some(p) => p,
            None => return Ok(None),
        };

        // Only columns set here are written, so a concurrent sale's stock
        // decrement is not overwritten by an unrelated edit.
        let mut active: ProductActive = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(stock) = changes.stock {
            active.stock = Set(stock);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(images) = changes.images {
            active.images = Set(images);
        }
        if let Some(seller_name) = changes.seller_name {
            active.seller_name = Set(seller_name);
        }
        if let Some(seller_phone) = changes.seller_phone {
            active.seller_phone = Set(seller_phone);
        }

        let product = active.update(&self.orm).await?;
        Ok(Some(product_from_entity(product)))
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<bool> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }

    async fn commit_sale(&self, sale: NewSale) -> AppResult<CommittedSale> {
        let txn = self.orm.begin().await?;

        let backend = txn.get_database_backend();
        txn.execute(Statement::from_string(
            backend,
            // 0 would disable the timeout
            format!(
                "SET LOCAL lock_timeout = {}",
                self.lock_timeout.as_millis().max(1)
            ),
        ))
        .await?;

        // conditional decrement: the row lock taken here serializes
        // concurrent sales of the same product
        let updated = Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(sale.quantity))
            .filter(ProdCol::Id.eq(sale.product_id))
            .filter(ProdCol::Stock.gte(sale.quantity))
            .exec_with_returning(&txn)
            .await?;

        let product = match updated.into_iter().next() {
            Some(p) => p,
            None => {
                let current = Products::find_by_id(sale.product_id).one(&txn).await?;
                txn.rollback().await?;
                return Err(match current {
                    Some(p) => AppError::InsufficientStock {
                        requested: sale.quantity,
                        available: p.stock,
                    },
                    None => AppError::NotFound("Product"),
                });
            }
        };

        // An error here drops `txn`, which rolls the decrement back.
        let row = SaleActive {
            id: Set(Uuid::new_v4()),
            product_id: Set(sale.product_id),
            quantity: Set(sale.quantity),
            buyer: Set(sale.buyer),
            date: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(CommittedSale {
            sale: sale_from_entity(row),
            remaining_stock: product.stock,
        })
    }

    async fn list_sales(&self, filter: &SaleFilter) -> AppResult<Page<Sale>> {
        let mut condition = Condition::all();
        if let Some(product_id) = filter.product_id {
            condition = condition.add(SaleCol::ProductId.eq(product_id));
        }

        let finder = Sales::find()
            .filter(condition)
            .order_by_desc(SaleCol::Date)
            .order_by_asc(SaleCol::Id);

        let total = finder.clone().count(&self.orm).await? as i64;

        let items = finder
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(sale_from_entity)
            .collect();

        Ok(Page { items, total })
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        price: model.price,
        stock: model.stock,
        description: model.description,
        images: model.images,
        seller_name: model.seller_name,
        seller_phone: model.seller_phone,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn sale_from_entity(model: SaleModel) -> Sale {
    Sale {
        id: model.id,
        product_id: model.product_id,
        quantity: model.quantity,
        buyer: model.buyer,
        date: model.date.with_timezone(&Utc),
    }
}
