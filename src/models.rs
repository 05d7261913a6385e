use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub description: String,
    pub images: Vec<String>,
    pub seller_name: Option<String>,
    pub seller_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A completed purchase. Never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub buyer: Option<String>,
    pub date: DateTime<Utc>,
}
