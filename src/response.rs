use serde::Serialize;
use utoipa::ToSchema;

/// Paging details attached to list responses.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub page: i64,
    pub per_page: i64,
    /// Matching rows across all pages.
    pub total: i64,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page,
            per_page,
            total,
        }
    }
}

/// Success envelope. `meta` is only present on list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta: None,
        }
    }

    pub fn paged(message: impl Into<String>, data: T, meta: Meta) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta: Some(meta),
        }
    }
}

/// Body of every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_item_responses_omit_meta() {
        let body = serde_json::to_value(ApiResponse::ok("Product", 7)).unwrap();
        assert_eq!(body, json!({ "message": "Product", "data": 7 }));
    }

    #[test]
    fn list_responses_carry_paging() {
        let body =
            serde_json::to_value(ApiResponse::paged("Sales", [1, 2], Meta::new(2, 2, 5))).unwrap();
        assert_eq!(body["meta"], json!({ "page": 2, "per_page": 2, "total": 5 }));
    }
}
