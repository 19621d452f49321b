//! 核心中间件模块

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tera::Context;
use tracing::{info, warn};

use super::{error::ErrorPage, state::AppState};

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    info!(
        "{} {} - {} - {}ms - User-Agent: {:?}",
        method,
        uri,
        status,
        duration.as_millis(),
        user_agent
    );

    response
}

/// 错误页中间件：把页面路由留下的 [`ErrorPage`] 渲染成 HTML
pub async fn render_error_page(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    let status = response.status();
    let mut context = Context::new();
    context.insert("status", &status.as_u16());
    context.insert("message", &page.message);

    match state.views.render("error.html", &context) {
        Ok(html) => (status, html).into_response(),
        Err(e) => {
            warn!("Failed to render error page: {}", e);
            (status, page.message).into_response()
        }
    }
}
