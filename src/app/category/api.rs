//! 分类 JSON 接口

use axum::{extract::State, response::Json};

use super::model::Category;
use crate::core::{error::CoreError, response::ApiResponse, state::AppState};

/// GET /api/categories
pub async fn all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, CoreError> {
    let categories = state.category_service.all().await?;
    Ok(Json(ApiResponse::success(categories)))
}
