//! 产品存储

use async_trait::async_trait;
use sqlx::PgPool;

use super::model::{Product, ProductForm, ProductView};
use crate::{
    core::error::CoreError,
    infrastructure::memory::{MemoryStore, MemoryTables},
};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 连表查询，一次取回分类名称
    async fn all(&self) -> Result<Vec<ProductView>, CoreError>;
    async fn get(&self, id: i32) -> Result<Option<Product>, CoreError>;
    async fn insert(&self, form: &ProductForm) -> Result<Product, CoreError>;
    async fn update(&self, id: i32, form: &ProductForm) -> Result<bool, CoreError>;
    async fn delete(&self, id: i32) -> Result<bool, CoreError>;
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn all(&self) -> Result<Vec<ProductView>, CoreError> {
        let products = sqlx::query_as::<_, ProductView>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.category_id,
                   c.name AS category_name
            FROM products p
            JOIN categories c ON c.id = p.category_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, CoreError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, category_id FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn insert(&self, form: &ProductForm) -> Result<Product, CoreError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, category_id
            "#,
        )
        .bind(&form.name)
        .bind(&form.description)
        .bind(form.price)
        .bind(form.category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    async fn update(&self, id: i32, form: &ProductForm) -> Result<bool, CoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $1, description = $2, price = $3, category_id = $4
            WHERE id = $5
            "#,
        )
        .bind(&form.name)
        .bind(&form.description)
        .bind(form.price)
        .bind(form.category_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// 复现 products.category_id 外键
fn check_category(tables: &MemoryTables, category_id: i32) -> Result<(), CoreError> {
    if tables.categories.contains_key(&category_id) {
        Ok(())
    } else {
        Err(CoreError::BadRequest(format!(
            "category {} does not exist",
            category_id
        )))
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn all(&self) -> Result<Vec<ProductView>, CoreError> {
        let tables = self.tables.read().await;
        let products = tables
            .products
            .values()
            .filter_map(|p| {
                let category = tables.categories.get(&p.category_id)?;
                Some(ProductView {
                    id: p.id,
                    name: p.name.clone(),
                    description: p.description.clone(),
                    price: p.price,
                    category_id: p.category_id,
                    category_name: category.name.clone(),
                })
            })
            .collect();
        Ok(products)
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, CoreError> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn insert(&self, form: &ProductForm) -> Result<Product, CoreError> {
        let mut tables = self.tables.write().await;
        check_category(&tables, form.category_id)?;

        let product = Product {
            id: tables.next_product_id(),
            name: form.name.clone(),
            description: form.description.clone(),
            price: form.price,
            category_id: form.category_id,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: i32, form: &ProductForm) -> Result<bool, CoreError> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Ok(false);
        }
        check_category(&tables, form.category_id)?;

        if let Some(product) = tables.products.get_mut(&id) {
            product.name = form.name.clone();
            product.description = form.description.clone();
            product.price = form.price;
            product.category_id = form.category_id;
        }
        Ok(true)
    }

    async fn delete(&self, id: i32) -> Result<bool, CoreError> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }
}
