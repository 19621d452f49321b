//! 核心错误处理模块

use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid username or password")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("{0}")]
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::Unauthorized => StatusCode::UNAUTHORIZED,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Conflict(_) => StatusCode::CONFLICT,
            CoreError::Database(_) | CoreError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回给用户的错误信息，数据库细节只写日志
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Database(e) => {
                error!("Database error: {}", e);
                "Database error".to_string()
            }
            CoreError::InternalServerError(msg) => {
                error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    fn code_name(&self) -> &'static str {
        match self {
            CoreError::BadRequest(_) => "BAD_REQUEST",
            CoreError::Unauthorized => "UNAUTHORIZED",
            CoreError::NotFound(_) => "NOT_FOUND",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::Database(_) | CoreError::InternalServerError(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_response = ErrorResponse {
            error: self.code_name().to_string(),
            message: self.user_message(),
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        // 约束冲突交给调用方区分，其余一律视为服务端错误
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return CoreError::Conflict(format!(
                    "record already exists ({})",
                    db_err.constraint().unwrap_or("unique")
                ));
            }
            if db_err.is_foreign_key_violation() {
                return CoreError::BadRequest(format!(
                    "referenced record does not exist or is still in use ({})",
                    db_err.constraint().unwrap_or("foreign key")
                ));
            }
        }
        CoreError::Database(err)
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort();

        CoreError::BadRequest(messages.join(", "))
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<FormRejection> for CoreError {
    fn from(rejection: FormRejection) -> Self {
        CoreError::BadRequest(format!("Invalid form data: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for CoreError {
    fn from(rejection: PathRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl From<tera::Error> for CoreError {
    fn from(err: tera::Error) -> Self {
        CoreError::InternalServerError(format!("template error: {:?}", err))
    }
}

/// 页面路由使用的错误包装
///
/// 响应本身不带正文，只在扩展里留下 [`ErrorPage`]，
/// 由 `render_error_page` 中间件统一渲染 `error.html`。
#[derive(Debug)]
pub struct PageError(pub CoreError);

/// 待渲染的错误页信息
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub message: String,
}

impl From<CoreError> for PageError {
    fn from(err: CoreError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let mut response = status.into_response();
        response.extensions_mut().insert(ErrorPage {
            message: self.0.user_message(),
        });
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CoreError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(CoreError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            CoreError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(CoreError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            CoreError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_details_are_hidden() {
        let err = CoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, CoreError::Database(_)));
        assert_eq!(err.user_message(), "Database error");
    }

    #[test]
    fn test_validation_errors_become_bad_request() {
        let sample = Sample {
            name: String::new(),
        };
        let err = CoreError::from(sample.validate().unwrap_err());
        match err {
            CoreError::BadRequest(msg) => assert_eq!(msg, "name is required"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_page_error_carries_error_page() {
        let response = PageError(CoreError::NotFound("Category 7 not found".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let page = response.extensions().get::<ErrorPage>().unwrap();
        assert_eq!(page.message, "Category 7 not found");
    }
}
