use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use hyper::{Method, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use crate::helpers::{mock_metar, spawn_app, MockMetarSource};
use metar_api::awc;

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.expect("Failed to execute request.");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).expect("response body is JSON");
    (status, json)
}

#[tokio::test]
async fn default_query_fetches_the_popular_airport_list() {
    let mut source = MockMetarSource::new();
    source
        .expect_by_ids()
        .withf(|ids| ids.len() == 20 && ids[0] == "KJFK")
        .times(1)
        .returning(|ids| Ok(ids.iter().map(|id| mock_metar(id)).collect()));

    let test_app = spawn_app(Arc::new(source));
    let (status, json) = get(test_app.app.clone(), "/metar").await;

    assert_eq!(status, StatusCode::OK);
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 20);
    assert_eq!(records[0]["icaoId"], "KJFK");
    assert_eq!(records[0]["fltCat"], "VFR");
    assert_eq!(records[0]["display"]["color"], "#22c55e");
}

#[tokio::test]
async fn ids_are_cleaned_and_deduplicated_before_the_upstream_call() {
    let mut source = MockMetarSource::new();
    source
        .expect_by_ids()
        .withf(|ids| ids == ["KJFK".to_string(), "KORD".to_string()])
        .times(1)
        .returning(|ids| Ok(ids.iter().map(|id| mock_metar(id)).collect()));

    let test_app = spawn_app(Arc::new(source));
    let (status, json) = get(test_app.app.clone(), "/metar?ids=kjfk,%20KJFK%20,kord").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn states_resolve_to_a_single_bbox_call() {
    let mut source = MockMetarSource::new();
    source
        .expect_by_bbox()
        .withf(|bbox| {
            bbox.south == 41.15 && bbox.west == -71.86 && bbox.north == 42.02 && bbox.east == -71.12
        })
        .times(1)
        .returning(|_| Ok(vec![mock_metar("KPVD")]));

    let test_app = spawn_app(Arc::new(source));
    let (status, json) = get(test_app.app.clone(), "/metar?states=ri").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["icaoId"], "KPVD");
}

#[tokio::test]
async fn bbox_results_drop_non_domestic_stations() {
    let mut source = MockMetarSource::new();
    source.expect_by_bbox().times(1).returning(|_| {
        Ok(vec![
            mock_metar("KJFK"),
            mock_metar("CYYZ"),
            mock_metar("TJSJ"),
            mock_metar("MMMX"),
        ])
    });

    let test_app = spawn_app(Arc::new(source));
    let (status, json) = get(test_app.app.clone(), "/metar?bbox=24,-90,50,-66").await;

    assert_eq!(status, StatusCode::OK);
    let kept: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["icaoId"].as_str().unwrap())
        .collect();
    assert_eq!(kept, vec!["KJFK", "TJSJ"]);
}

#[tokio::test]
async fn explicit_id_queries_are_never_post_filtered() {
    let mut source = MockMetarSource::new();
    source
        .expect_by_ids()
        .times(1)
        .returning(|_| Ok(vec![mock_metar("CYYZ")]));

    let test_app = spawn_app(Arc::new(source));
    let (status, json) = get(test_app.app.clone(), "/metar?ids=CYYZ").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["icaoId"], "CYYZ");
}

#[tokio::test]
async fn unknown_region_is_rejected_without_touching_the_upstream() {
    let source = MockMetarSource::new();
    // no expectations: any upstream call would panic the mock

    let test_app = spawn_app(Arc::new(source));
    let (status, json) = get(test_app.app.clone(), "/metar?region=atlantis").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "unknown region 'atlantis'");
}

#[tokio::test]
async fn malformed_bbox_is_rejected() {
    let test_app = spawn_app(Arc::new(MockMetarSource::new()));
    let (status, json) = get(test_app.app.clone(), "/metar?bbox=1,2,3").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("bbox"));
}

#[tokio::test]
async fn empty_result_for_explicit_ids_is_a_no_data_message() {
    let mut source = MockMetarSource::new();
    source.expect_by_ids().times(1).returning(|_| Ok(vec![]));

    let test_app = spawn_app(Arc::new(source));
    let (status, json) = get(test_app.app.clone(), "/metar?ids=KZZZ").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["error"], "No data found for KZZZ");
}

#[tokio::test]
async fn empty_area_result_is_a_plain_empty_list() {
    let mut source = MockMetarSource::new();
    source.expect_by_bbox().times(1).returning(|_| Ok(vec![]));

    let test_app = spawn_app(Arc::new(source));
    let (status, json) = get(test_app.app.clone(), "/metar?bbox=1,2,3,4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn total_upstream_failure_is_a_bad_gateway() {
    let mut source = MockMetarSource::new();
    source
        .expect_by_ids()
        .times(1)
        .returning(|_| Err(awc::Error::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)));

    let test_app = spawn_app(Arc::new(source));
    let (status, json) = get(test_app.app.clone(), "/metar?ids=KJFK").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "weather source unavailable");
}
