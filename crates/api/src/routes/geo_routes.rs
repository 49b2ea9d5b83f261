use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::geo::{RegionInfo, StateInfo};
use crate::startup::AppState;

/// Reference tables for the UI's state/region selectors.
#[derive(Debug, Serialize, ToSchema)]
pub struct GeoResponse {
    pub states: Vec<StateInfo>,
    pub regions: Vec<RegionInfo>,
}

#[utoipa::path(
    get,
    path = "/geo",
    responses(
        (status = OK, description = "State and region reference tables", body = GeoResponse),
    )
)]
pub async fn get_geo(State(state): State<Arc<AppState>>) -> Json<GeoResponse> {
    Json(GeoResponse {
        states: state.geo.states().to_vec(),
        regions: state.geo.regions().to_vec(),
    })
}
