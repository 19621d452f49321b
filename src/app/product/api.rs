//! 产品 JSON 接口

use axum::{
    extract::State,
    response::Json,
};

use super::model::{Product, ProductForm, ProductView};
use crate::core::{
    error::CoreError,
    extract::ApiJson,
    response::{ApiResponse, Created},
    state::AppState,
};

/// GET /api/products
pub async fn all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductView>>>, CoreError> {
    let products = state.product_service.all().await?;
    Ok(Json(ApiResponse::success(products)))
}

/// POST /api/products
pub async fn add(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProductForm>,
) -> Result<Created<Product>, CoreError> {
    let product = state.product_service.add(payload).await?;
    Ok(Created(product))
}
