#![allow(dead_code)]

use std::sync::Arc;

use storefront_api::{
    config::AppConfig,
    models::Product,
    state::AppState,
    store::{MemoryStore, NewProduct, Store},
};

pub fn test_config(admin_password: Option<&str>) -> AppConfig {
    let mut config = AppConfig::from_vars(|_| None).expect("default config");
    config.admin_password = admin_password.map(str::to_string);
    config
}

pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState::new(store.clone(), test_config(Some("letmein")));
    (state, store)
}

pub async fn seed_product(store: &dyn Store, name: &str, stock: i32) -> Product {
    store
        .create_product(NewProduct {
            name: name.to_string(),
            price: 12.5,
            stock,
            description: format!("{name} for testing"),
            images: vec!["https://example.com/a.png".into()],
            seller_name: Some("Ama".into()),
            seller_phone: Some("+233 20 000 0000".into()),
        })
        .await
        .expect("seed product")
}
