mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use storefront_api::app::build_app;
use tower::ServiceExt;
use uuid::Uuid;

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn app() -> Router {
    let (state, _store) = common::memory_state();
    build_app(state)
}

async fn create_product(app: &Router, body: Value) -> Value {
    let (status, resp) = send(app, Method::POST, "/api/products", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{resp}");
    resp["data"].clone()
}

#[tokio::test]
async fn product_crud_round_trip() {
    let app = app();

    let product = create_product(
        &app,
        json!({
            "name": "Basket",
            "price": 18.5,
            "stock": 12,
            "images": ["a.png", "b.png"],
            "sellerName": "Ama",
            "sellerPhone": "+233 20 000 0000"
        }),
    )
    .await;
    assert_eq!(product["name"], "Basket");
    assert_eq!(product["description"], "");
    assert_eq!(product["sellerName"], "Ama");
    assert_eq!(product["images"], json!(["a.png", "b.png"]));
    let id = product["id"].as_str().unwrap().to_string();

    let (status, resp) = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["stock"], 12);

    let (status, resp) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{id}"),
        Some(json!({ "price": 20.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["price"], 20.0);
    assert_eq!(resp["data"]["name"], "Basket");

    let (status, resp) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["meta"]["total"], 1);

    let (status, resp) = send(&app, Method::DELETE, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["success"], true);

    let (status, resp) = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp, json!({ "error": "Product not found" }));
}

#[tokio::test]
async fn create_product_requires_name() {
    let app = app();

    let (status, resp) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "price": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, json!({ "error": "Missing name" }));
}

#[tokio::test]
async fn negative_stock_is_rejected() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "Jug", "stock": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_list_filters_and_paginates() {
    let app = app();
    for (name, price) in [("Red mug", 5.0), ("Blue mug", 15.0), ("Lamp", 25.0)] {
        create_product(&app, json!({ "name": name, "price": price })).await;
    }

    let (status, resp) = send(
        &app,
        Method::GET,
        "/api/products?q=MUG&sort_by=price&sort_order=asc&per_page=1&page=2",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["meta"]["total"], 2);
    assert_eq!(resp["meta"]["page"], 2);
    assert_eq!(resp["data"]["items"][0]["name"], "Blue mug");

    let (status, resp) = send(
        &app,
        Method::GET,
        "/api/products?min_price=10&max_price=20",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["meta"]["total"], 1);
}

#[tokio::test]
async fn malformed_query_is_a_bad_request() {
    let app = app();

    let (status, resp) = send(&app, Method::GET, "/api/products?page=first", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].is_string());
}

#[tokio::test]
async fn out_of_range_page_is_a_bad_request() {
    let app = app();
    create_product(&app, json!({ "name": "Lamp" })).await;

    for uri in [
        "/api/products?page=9223372036854775807",
        "/api/sales?page=9223372036854775807&per_page=100",
    ] {
        let (status, resp) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(resp, json!({ "error": "page is out of range" }));
    }

    // far past the end but representable: just an empty page
    let (status, resp) = send(&app, Method::GET, "/api/products?page=1000000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["meta"]["total"], 1);
    assert_eq!(resp["data"]["items"], json!([]));
}

#[tokio::test]
async fn malformed_product_id_is_a_json_bad_request() {
    let app = app();

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let body = (method == Method::PUT).then(|| json!({ "price": 1.0 }));
        let (status, resp) = send(&app, method.clone(), "/api/products/not-a-uuid", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert!(resp["error"].is_string(), "{method}: {resp}");
    }
}

#[tokio::test]
async fn update_can_clear_seller_details() {
    let app = app();
    let product = create_product(
        &app,
        json!({ "name": "Basket", "sellerName": "Ama", "sellerPhone": "555" }),
    )
    .await;
    let uri = format!("/api/products/{}", product["id"].as_str().unwrap());

    let (status, resp) = send(&app, Method::PUT, &uri, Some(json!({ "price": 4.0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["sellerName"], "Ama");

    let (status, resp) = send(&app, Method::PUT, &uri, Some(json!({ "sellerName": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["sellerName"], Value::Null);
    assert_eq!(resp["data"]["sellerPhone"], "555");
}

#[tokio::test]
async fn sale_endpoint_records_and_reports_errors() {
    let app = app();
    let product = create_product(&app, json!({ "name": "Basket", "stock": 5 })).await;
    let id = product["id"].as_str().unwrap().to_string();

    let (status, resp) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({ "productId": id, "quantity": 3, "buyer": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{resp}");
    assert_eq!(resp["data"]["productId"], id.as_str());
    assert_eq!(resp["data"]["quantity"], 3);
    assert_eq!(resp["data"]["buyer"], "alice");
    assert!(resp["data"]["date"].is_string());

    let (_, resp) = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(resp["data"]["stock"], 2);

    let (status, resp) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({ "productId": id, "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        resp,
        json!({ "error": "Insufficient stock: requested 3, available 2" })
    );

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({ "productId": Uuid::new_v4(), "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, resp) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({ "productId": id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, json!({ "error": "productId and quantity required" }));

    let (status, resp) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({ "productId": "not-a-uuid", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].is_string());

    let (status, resp) = send(&app, Method::GET, "/api/sales", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["meta"]["total"], 1);
}

#[tokio::test]
async fn admin_login_checks_the_configured_password() {
    let app = app();

    let (status, resp) = send(
        &app,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "password": "letmein" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["success"], true);

    let (status, resp) = send(
        &app,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "password": "guess" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp, json!({ "error": "Invalid credentials" }));
}

#[tokio::test]
async fn admin_login_without_configured_password_is_a_server_error() {
    let state = storefront_api::state::AppState::new(
        std::sync::Arc::new(storefront_api::store::MemoryStore::default()),
        common::test_config(None),
    );
    let app = build_app(state);

    let (status, resp) = send(
        &app,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "password": "anything" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp, json!({ "error": "Admin password not configured" }));
}

#[tokio::test]
async fn unknown_api_route_is_json_404() {
    let app = app();

    let (status, resp) = send(&app, Method::GET, "/api/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp, json!({ "error": "No route for /api/nope" }));
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn static_frontend_is_served_outside_the_api() {
    let app = app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("<title>Storefront</title>"));

    let (status, resp) = send(&app, Method::GET, "/missing.txt", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp, json!({ "error": "No route for /missing.txt" }));
}
