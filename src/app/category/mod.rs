//! 分类

pub mod api;
mod model;
pub mod page;
mod repository;
mod service;

pub use model::{Category, CategoryForm};
pub use repository::{CategoryRepository, PgCategoryRepository};
pub use service::CategoryService;
