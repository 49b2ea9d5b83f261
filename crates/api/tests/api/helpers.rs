use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use metar_api::awc::{self, MetarSource};
use metar_api::{app, AppState, BoundingBox, GeoTables, RawMetar};
use mockall::mock;

mock! {
    pub MetarSource {}

    #[async_trait]
    impl MetarSource for MetarSource {
        async fn by_ids(&self, ids: &[String]) -> Result<Vec<RawMetar>, awc::Error>;
        async fn by_bbox(&self, bbox: &BoundingBox) -> Result<Vec<RawMetar>, awc::Error>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub fn spawn_app(source: Arc<dyn MetarSource>) -> TestApp {
    let state = AppState {
        static_dir: "./static".to_string(),
        remote_url: "http://localhost:9400".to_string(),
        geo: Arc::new(GeoTables::new()),
        metar_source: source,
    };
    TestApp { app: app(state) }
}

/// Minimal upstream record for a station id.
pub fn mock_metar(id: &str) -> RawMetar {
    RawMetar {
        icao_id: Some(id.to_string()),
        name: Some(format!("{} Intl", id)),
        lat: Some(40.64),
        lon: Some(-73.78),
        temp: Some(21.0),
        flt_cat: Some("VFR".to_string()),
        obs_time: Some(1705327500),
        ..Default::default()
    }
}
