use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use hyper::{Method, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use crate::helpers::{spawn_app, MockMetarSource};

#[tokio::test]
async fn geo_endpoint_serves_the_reference_tables() {
    let test_app = spawn_app(Arc::new(MockMetarSource::new()));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/geo")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["states"].as_array().unwrap().len(), 50);
    assert_eq!(json["regions"].as_array().unwrap().len(), 7);

    let northeast = json["regions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"] == "northeast")
        .unwrap();
    assert_eq!(
        northeast["bbox"],
        serde_json::json!([38.45, -80.52, 47.46, -66.95])
    );
    assert!(northeast["states"]
        .as_array()
        .unwrap()
        .contains(&Value::String("RI".into())));
}
