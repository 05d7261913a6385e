use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_api::{
    app::build_app,
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    state::AppState,
    store::{MemoryStore, PgStore, Store},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(url) => {
            let orm = create_orm_conn(url).await?;
            if config.run_migrations {
                run_migrations(&orm, "migrations").await?;
            }
            Arc::new(PgStore::new(orm, config.sale_lock_timeout))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, data lives in memory and is lost on exit");
            Arc::new(MemoryStore::new(config.sale_lock_timeout))
        }
    };

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let app = build_app(AppState::new(store, config));

    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
