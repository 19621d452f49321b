mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{add_category, server};

async fn add_product(server: &TestServer, name: &str, price: &str, category_id: &str) {
    let response = server
        .post("/products/add")
        .form(&[
            ("name", name),
            ("description", "  "),
            ("price", price),
            ("category_id", category_id),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/products");
}

#[tokio::test]
async fn test_root_and_products_list_with_category_names() {
    let server = server();
    add_category(&server, "Electronics").await;
    add_product(&server, "Laptop", "999.5", "1").await;

    for path in ["/", "/products"] {
        let page = server.get(path).await;
        page.assert_status_ok();
        let html = page.text();
        assert!(html.contains("<td>Laptop</td>"));
        assert!(html.contains("<td>Electronics</td>"));
        assert!(html.contains("999.5"));
    }
}

#[tokio::test]
async fn test_add_form_lists_categories() {
    let server = server();

    let empty = server.get("/products/add").await.text();
    assert!(empty.contains("before adding products"));

    add_category(&server, "Garden").await;
    let html = server.get("/products/add").await.text();
    assert!(html.contains(r#"<option value="1">Garden</option>"#));
}

#[tokio::test]
async fn test_unknown_category_redirects_back_with_error() {
    let server = server();
    add_category(&server, "Garden").await;

    let response = server
        .post("/products/add")
        .form(&[("name", "Rake"), ("price", "12"), ("category_id", "9")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/products/add");

    let html = server.get("/products/add").await.text();
    assert!(html.contains("category 9 does not exist"));
    assert!(server.get("/products").await.text().contains("No products yet."));
}

#[tokio::test]
async fn test_edit_and_update_product() {
    let server = server();
    add_category(&server, "Fruit").await;
    add_category(&server, "Vegetables").await;
    add_product(&server, "Tomato", "2", "1").await;

    let html = server.get("/products/edit/1").await.text();
    assert!(html.contains(r#"value="Tomato""#));
    assert!(html.contains(r#"<option value="1" selected>Fruit</option>"#));

    let response = server
        .post("/products/update/1")
        .form(&[
            ("name", "Tomato"),
            ("description", "Actually a fruit"),
            ("price", "2.75"),
            ("category_id", "2"),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/products");

    let html = server.get("/products").await.text();
    assert!(html.contains("Product updated"));
    assert!(html.contains("<td>Vegetables</td>"));
    assert!(html.contains("Actually a fruit"));
    assert!(html.contains("2.75"));
}

#[tokio::test]
async fn test_update_missing_product_is_a_no_op() {
    let server = server();
    add_category(&server, "Fruit").await;

    let response = server
        .post("/products/update/5")
        .form(&[("name", "Ghost"), ("price", "1"), ("category_id", "1")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/products");

    let html = server.get("/products").await.text();
    assert!(html.contains("Product 5 no longer exists"));
    assert!(html.contains("No products yet."));
}

#[tokio::test]
async fn test_edit_unknown_product_renders_error_page() {
    let page = server().get("/products/edit/42").await;
    page.assert_status(StatusCode::NOT_FOUND);
    assert!(page.text().contains("Product 42 not found"));
}

#[tokio::test]
async fn test_delete_product_twice() {
    let server = server();
    add_category(&server, "Office").await;
    add_product(&server, "Stapler", "8", "1").await;

    server
        .post("/products/delete/1")
        .await
        .assert_status(StatusCode::SEE_OTHER);
    let html = server.get("/products").await.text();
    assert!(!html.contains("<td>Stapler</td>"));
    assert!(html.contains("Product deleted"));

    let response = server.post("/products/delete/1").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/products");
    assert!(server
        .get("/products")
        .await
        .text()
        .contains("Product 1 was already deleted"));
}

#[tokio::test]
async fn test_static_files_are_served() {
    let response = server().get("/css/style.css").await;
    response.assert_status_ok();
    assert!(response.text().contains("font-family"));
}

#[tokio::test]
async fn test_non_finite_price_is_rejected() {
    let server = server();
    add_category(&server, "Garden").await;

    for price in ["NaN", "inf"] {
        let response = server
            .post("/products/add")
            .form(&[("name", "Hose"), ("price", price), ("category_id", "1")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/products/add");
        assert!(server
            .get("/products/add")
            .await
            .text()
            .contains("Price must be a finite number"));
    }

    let list = server.get("/products").await;
    list.assert_status_ok();
    assert!(list.text().contains("No products yet."));
}

#[tokio::test]
async fn test_unparseable_form_redirects_back_with_error() {
    let server = server();
    add_category(&server, "Garden").await;

    let response = server
        .post("/products/add")
        .form(&[("name", "Hose"), ("price", ""), ("category_id", "1")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/products/add");
    assert!(server
        .get("/products/add")
        .await
        .text()
        .contains("Invalid form data"));

    add_product(&server, "Hose", "10", "1").await;
    let response = server
        .post("/products/update/1")
        .form(&[("name", "Hose"), ("price", "cheap"), ("category_id", "1")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/products/edit/1");
    assert!(server
        .get("/products/edit/1")
        .await
        .text()
        .contains("Invalid form data"));
}

#[tokio::test]
async fn test_non_numeric_id_renders_error_page() {
    let server = server();

    let page = server.get("/products/edit/abc").await;
    page.assert_status(StatusCode::BAD_REQUEST);
    assert!(page.text().contains("Something went wrong (400)"));

    let page = server.post("/products/delete/abc").await;
    page.assert_status(StatusCode::BAD_REQUEST);
    assert!(page.text().contains("Something went wrong (400)"));
}
