use std::sync::Arc;

use anyhow::Context;
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::products::CreateProductRequest,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
    store::PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL must be set to seed")?;

    let orm = create_orm_conn(&database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm, "migrations").await?;

    let store = Arc::new(PgStore::new(orm, config.sale_lock_timeout));
    let state = AppState::new(store, config);

    let existing = product_service::list_products(&state, ProductQuery::default()).await?;
    if existing.meta.map_or(0, |m| m.total) > 0 {
        println!("Products already present, nothing to seed");
        return Ok(());
    }

    let products = vec![
        ("Handwoven Basket", "Palm-leaf basket, medium size", 18.5, 12),
        ("Clay Water Jug", "Fired clay, keeps water cool", 9.0, 30),
        ("Shea Butter 250g", "Unrefined, locally sourced", 6.75, 50),
        ("Beaded Necklace", "Glass beads on cotton cord", 14.0, 8),
    ];

    for (name, description, price, stock) in products {
        product_service::create_product(
            &state,
            CreateProductRequest {
                name: Some(name.into()),
                price: Some(price),
                stock: Some(stock),
                description: Some(description.into()),
                seller_name: Some("Demo Seller".into()),
                seller_phone: Some("+000 000 0000".into()),
                ..Default::default()
            },
        )
        .await?;
        println!("Seeded {name}");
    }

    Ok(())
}
