//! # 产品目录
//!
//! 基于 Axum + SQLx 的产品与分类管理服务：
//! - HTML 表单页面（Tera 模板渲染）
//! - 同一份数据的 JSON API
//! - 简单的用户注册/登录接口

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::router;
pub use crate::core::{error::CoreError, state::AppState};
