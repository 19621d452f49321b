use axum::http::StatusCode;
use axum_test::{TestServer, TestServerConfig};
use product_catalog::{infrastructure::config::SessionConfig, router, AppState};

/// 全内存后端的测试服务器，保存 cookie 以保持会话
pub fn server() -> TestServer {
    let state = AppState::in_memory(&SessionConfig::default()).unwrap();
    let config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    TestServer::new_with_config(router(state, "public"), config).unwrap()
}

pub async fn add_category(server: &TestServer, name: &str) {
    server
        .post("/categories/add")
        .form(&[("name", name)])
        .await
        .assert_status(StatusCode::SEE_OTHER);
}
