mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::TimeDelta;
use order_desk_api::{
    middleware::auth::{Claims, issue_token},
    routes::build_app,
};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> anyhow::Result<Router> {
    Ok(build_app(common::setup_state().await?))
}

fn bearer() -> anyhow::Result<String> {
    let token = issue_token(
        common::JWT_SECRET,
        &Claims::new("clerk", TimeDelta::minutes(5)),
    )?;
    Ok(format!("Bearer {token}"))
}

fn json_request(method: &str, uri: &str, body: &Value, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn customer_body(id: i16, name: &str) -> Value {
    json!({
        "customerId": id,
        "customerTitle": "Mr",
        "customerName": name,
        "customerSurname": "Naidoo",
        "cellPhone": "0821234567"
    })
}

#[tokio::test]
async fn customer_lifecycle_over_http() -> anyhow::Result<()> {
    let app = app().await?;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/customers", None))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/customers", &customer_body(3, "Sipho"), None))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
        Some(&b"/api/customers/3"[..])
    );
    let created = body_json(response).await?;
    assert_eq!(created["data"]["customerName"], "Sipho");

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/customers/3", &customer_body(3, "Thabo"), None))
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/customers/3",
            &json!([{ "op": "remove", "path": "/cellPhone" }]),
            None,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/customers/3", None))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await?;
    assert_eq!(fetched["data"]["customerName"], "Thabo");
    assert_eq!(fetched["data"]["cellPhone"], Value::Null);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/api/customers/3", None))
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request("DELETE", "/api/customers/3", None))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_and_mismatched_bodies_are_bad_requests() -> anyhow::Result<()> {
    let app = app().await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/customers")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/customers", &customer_body(4, "Lerato"), None))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/customers/4", &customer_body(5, "Lerato"), None))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request("POST", "/api/customers", &customer_body(4, "Again"), None))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn orders_and_products_require_a_token() -> anyhow::Result<()> {
    let app = app().await?;

    for uri in ["/api/orders", "/api/products", "/api/products/order/1"] {
        let response = app.clone().oneshot(empty_request("GET", uri, None)).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/orders", Some("Bearer not-a-token")))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let auth = bearer()?;
    let response = app
        .oneshot(empty_request("GET", "/api/orders", Some(&auth)))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn order_flow_over_http() -> anyhow::Result<()> {
    let app = app().await?;
    let auth = bearer()?;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/customers", &customer_body(5, "Ann"), None))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/products",
            &json!({ "productId": 9, "productName": "Kettle", "unitsInStock": 3 }),
            Some(&auth),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let order = json!({
        "orderId": 1,
        "customerId": 5,
        "deliveryAddress": "4 Main Road",
        "orderDetails": [{ "productId": 9, "quantity": 2, "discount": 10 }]
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/orders", &order, Some(&auth)))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
        Some(&b"/api/orders/1"[..])
    );
    let created = body_json(response).await?;
    assert_eq!(created["data"]["orderDetails"][0]["orderDetailsId"], 1);
    assert!(created["data"]["orderDate"].is_string());

    let missing_product = json!({
        "orderId": 2,
        "customerId": 5,
        "deliveryAddress": "4 Main Road",
        "orderDetails": [{ "productId": 77, "quantity": 1 }]
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/orders", &missing_product, Some(&auth)))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await?;
    assert_eq!(body["message"], "Product with ID 77 not found.");

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/products/order/1", Some(&auth)))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let products = body_json(response).await?;
    assert_eq!(products["data"][0]["productName"], "Kettle");

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/api/customers/5", None))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/api/products/9", Some(&auth)))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/api/orders/1", Some(&auth)))
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request("GET", "/api/orders/1", Some(&auth)))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unparsable_ids_answer_in_the_error_envelope() -> anyhow::Result<()> {
    let app = app().await?;
    let auth = bearer()?;

    for (uri, token) in [
        ("/api/customers/abc", None),
        ("/api/customers/40000", None),
        ("/api/orders/-x", Some(auth.as_str())),
    ] {
        let response = app.clone().oneshot(empty_request("GET", uri, token)).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = body_json(response).await?;
        assert!(body["data"]["error"].is_string(), "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn unknown_routes_fall_back_to_not_found() -> anyhow::Result<()> {
    let app = app().await?;
    let response = app
        .oneshot(empty_request("GET", "/api/nothing-here", None))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await?;
    assert_eq!(body["data"]["path"], "/api/nothing-here");
    Ok(())
}
