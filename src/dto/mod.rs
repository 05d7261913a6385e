use serde::Serialize;
use utoipa::ToSchema;

pub mod admin;
pub mod products;
pub mod sales;

#[derive(Debug, Serialize, ToSchema)]
pub struct Acknowledged {
    pub success: bool,
}
