pub mod admin_service;
pub mod product_service;
pub mod sale_service;
