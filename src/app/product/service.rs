//! 产品业务服务

use std::sync::Arc;
use tracing::info;

use super::{
    model::{Product, ProductForm, ProductView},
    repository::ProductRepository,
};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn all(&self) -> Result<Vec<ProductView>, CoreError> {
        self.repository.all().await
    }

    pub async fn get(&self, id: i32) -> Result<Product, CoreError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Product {} not found", id)))
    }

    /// 分类是否存在由数据库外键保证
    pub async fn add(&self, form: ProductForm) -> Result<Product, CoreError> {
        let form = form.validated()?;

        let product = self.repository.insert(&form).await?;
        info!("Created product: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn update(&self, id: i32, form: ProductForm) -> Result<bool, CoreError> {
        let form = form.validated()?;

        let updated = self.repository.update(id, &form).await?;
        if updated {
            info!("Updated product: {} ({})", form.name, id);
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, CoreError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!("Deleted product: {}", id);
        }
        Ok(deleted)
    }
}
