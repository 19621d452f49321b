//! 用户 JSON 接口

use axum::{
    extract::State,
    response::Json,
};
use tracing::{info, warn};

use super::model::{LoginRequest, SignUpRequest, User, UsersOverview};
use crate::core::{
    error::CoreError,
    extract::ApiJson,
    response::{ApiResponse, Created},
    session::Session,
    state::AppState,
};

const USER_ID_KEY: &str = "user_id";

/// GET /api/users
pub async fn users(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ApiResponse<UsersOverview>>, CoreError> {
    let current_user = match session.get::<i32>(USER_ID_KEY).await? {
        Some(id) => state.user_service.get(id).await?,
        None => None,
    };
    let users = state.user_service.all().await?;

    Ok(Json(ApiResponse::success(UsersOverview {
        current_user,
        users,
    })))
}

/// POST /api/signUp
pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignUpRequest>,
) -> Result<Created<User>, CoreError> {
    let user = state.user_service.create_account(payload).await?;
    Ok(Created(user))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<User>>, CoreError> {
    let Some(user) = state
        .user_service
        .find_by_credentials(&payload.username, &payload.password)
        .await?
    else {
        warn!("Failed login for {}", payload.username);
        return Err(CoreError::Unauthorized);
    };

    session.set(USER_ID_KEY, &user.id).await?;
    info!("User {} logged in", user.id);
    Ok(Json(ApiResponse::success(user)))
}

/// POST /api/logout
pub async fn logout(session: Session) -> Result<Json<ApiResponse<()>>, CoreError> {
    session.clear().await?;
    Ok(Json(ApiResponse::success(())))
}
