//! 应用层：按实体划分的页面路由、JSON 接口与业务服务

pub mod category;
pub mod product;
pub mod user;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeDir;

use crate::core::{
    middleware::{render_error_page, request_logging_middleware},
    state::AppState,
};

/// 注册全部路由；未匹配的路径交给静态文件目录
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        // 分类页面
        .route("/categories", get(category::page::show))
        .route(
            "/categories/add",
            get(category::page::show_add).post(category::page::add),
        )
        .route("/categories/edit/:id", get(category::page::get))
        .route("/categories/update/:id", post(category::page::update))
        .route("/categories/delete/:id", post(category::page::delete))
        // 产品页面
        .route("/", get(product::page::show))
        .route("/products", get(product::page::show))
        .route("/products/edit/:id", get(product::page::get))
        .route("/products/update/:id", post(product::page::update))
        .route(
            "/products/add",
            get(product::page::show_add).post(product::page::add),
        )
        .route("/products/delete/:id", post(product::page::delete))
        // JSON 接口
        .route(
            "/api/products",
            get(product::api::all).post(product::api::add),
        )
        .route("/api/categories", get(category::api::all))
        .route("/api/users", get(user::api::users))
        .route("/api/signUp", post(user::api::sign_up))
        .route("/api/login", post(user::api::login))
        .route("/api/logout", post(user::api::logout))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            render_error_page,
        ))
        .layer(CookieManagerLayer::new())
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(state)
}
