//! 产品

pub mod api;
mod model;
pub mod page;
mod repository;
mod service;

pub use model::{Product, ProductForm, ProductView};
pub use repository::{PgProductRepository, ProductRepository};
pub use service::ProductService;
