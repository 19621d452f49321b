//! 分类存储

use async_trait::async_trait;
use sqlx::PgPool;

use super::model::{Category, CategoryForm};
use crate::{core::error::CoreError, infrastructure::memory::MemoryStore};

/// 每个方法对应一条 SQL 语句
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<Category>, CoreError>;
    async fn get(&self, id: i32) -> Result<Option<Category>, CoreError>;
    async fn insert(&self, form: &CategoryForm) -> Result<Category, CoreError>;
    /// 返回是否有行被修改
    async fn update(&self, id: i32, form: &CategoryForm) -> Result<bool, CoreError>;
    /// 返回是否有行被删除
    async fn delete(&self, id: i32) -> Result<bool, CoreError>;
}

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn all(&self) -> Result<Vec<Category>, CoreError> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn get(&self, id: i32) -> Result<Option<Category>, CoreError> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn insert(&self, form: &CategoryForm) -> Result<Category, CoreError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&form.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn update(&self, id: i32, form: &CategoryForm) -> Result<bool, CoreError> {
        let result = sqlx::query("UPDATE categories SET name = $1 WHERE id = $2")
            .bind(&form.name)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn all(&self) -> Result<Vec<Category>, CoreError> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Category>, CoreError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn insert(&self, form: &CategoryForm) -> Result<Category, CoreError> {
        let mut tables = self.tables.write().await;
        let category = Category {
            id: tables.next_category_id(),
            name: form.name.clone(),
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: i32, form: &CategoryForm) -> Result<bool, CoreError> {
        let mut tables = self.tables.write().await;
        match tables.categories.get_mut(&id) {
            Some(category) => {
                category.name = form.name.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, CoreError> {
        let mut tables = self.tables.write().await;
        if tables.products.values().any(|p| p.category_id == id) {
            return Err(CoreError::BadRequest(format!(
                "category {} is still referenced by products",
                id
            )));
        }
        Ok(tables.categories.remove(&id).is_some())
    }
}
