//! 核心层：错误、响应、中间件、会话与模板

pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod session;
pub mod state;
pub mod view;
