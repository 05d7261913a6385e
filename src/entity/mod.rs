pub mod products;
pub mod sales;

pub use products::Entity as Products;
pub use sales::Entity as Sales;
