//! 分类业务服务

use std::sync::Arc;
use tracing::info;
use validator::Validate;

use super::{
    model::{Category, CategoryForm},
    repository::CategoryRepository,
};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn all(&self) -> Result<Vec<Category>, CoreError> {
        self.repository.all().await
    }

    pub async fn get(&self, id: i32) -> Result<Category, CoreError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn add(&self, form: CategoryForm) -> Result<Category, CoreError> {
        let form = form.normalized();
        form.validate()?;

        let category = self.repository.insert(&form).await?;
        info!("Created category: {} ({})", category.name, category.id);
        Ok(category)
    }

    /// 目标不存在时返回 `Ok(false)`，不视为错误
    pub async fn update(&self, id: i32, form: CategoryForm) -> Result<bool, CoreError> {
        let form = form.normalized();
        form.validate()?;

        let updated = self.repository.update(id, &form).await?;
        if updated {
            info!("Updated category: {} ({})", form.name, id);
        }
        Ok(updated)
    }

    /// 幂等删除：目标不存在时返回 `Ok(false)`
    pub async fn delete(&self, id: i32) -> Result<bool, CoreError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!("Deleted category: {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryStore;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let service = service();
        let created = service.add(CategoryForm::new("  Electronics ")).await.unwrap();

        assert_eq!(created.name, "Electronics");
        assert_eq!(service.all().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let service = service();
        let err = service.add(CategoryForm::new("   ")).await.unwrap_err();
        assert!(matches!(err, CoreError::BadRequest(_)));
        assert!(service.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_existing_and_missing() {
        let service = service();
        let created = service.add(CategoryForm::new("Books")).await.unwrap();

        assert!(service.update(created.id, CategoryForm::new("E-Books")).await.unwrap());
        assert_eq!(service.get(created.id).await.unwrap().name, "E-Books");

        assert!(!service.update(999, CategoryForm::new("Ghost")).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = service().get(42).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = service();
        let created = service.add(CategoryForm::new("Toys")).await.unwrap();

        assert!(service.delete(created.id).await.unwrap());
        assert!(!service.delete(created.id).await.unwrap());
        assert!(service.all().await.unwrap().is_empty());
    }
}
