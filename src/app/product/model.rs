//! 产品数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: i32,
}

/// 列表展示用：附带分类名称
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: i32,
    pub category_name: String,
}

/// 新增/修改产品的输入，页面表单与 JSON 接口共用
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1, max = 100, message = "Product name must be 1-100 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    pub category_id: i32,
}

impl ProductForm {
    /// 去掉首尾空白，空描述视为未填写
    pub fn normalized(self) -> Self {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Self {
            name: self.name.trim().to_string(),
            description,
            price: self.price,
            category_id: self.category_id,
        }
    }
    /// 规范化后校验；NaN 与无穷大不会被 `range` 拦下，单独检查
    pub fn validated(self) -> Result<Self, CoreError> {
        let form = self.normalized();
        form.validate()?;
        if !form.price.is_finite() {
            return Err(CoreError::BadRequest(
                "Price must be a finite number".to_string(),
            ));
        }
        Ok(form)
    }
}
