use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Sale;

/// Fields stay optional so a missing value is reported as a bad request
/// by the sale service instead of a body rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordSaleRequest {
    pub product_id: Option<Uuid>,
    pub quantity: Option<i64>,
    pub buyer: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleList {
    pub items: Vec<Sale>,
}
