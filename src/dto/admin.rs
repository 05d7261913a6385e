use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    pub password: Option<String>,
}
