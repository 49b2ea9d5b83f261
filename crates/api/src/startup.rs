use std::sync::Arc;

use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::awc::{AwcClient, MetarSource};
use crate::geo::GeoTables;
use crate::routes::{self, get_geo, get_metars};

#[derive(Clone)]
pub struct AppState {
    pub static_dir: String,
    pub remote_url: String,
    pub geo: Arc<GeoTables>,
    pub metar_source: Arc<dyn MetarSource>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::metar_routes::get_metars,
        routes::geo_routes::get_geo,
    ),
    components(
        schemas(
            crate::observations::MetarObservation,
            crate::observations::FlightCategory,
            crate::observations::Visibility,
            crate::observations::CloudLayer,
            crate::observations::ObservationDisplay,
            crate::geo::StateInfo,
            crate::geo::RegionInfo,
            routes::metar_routes::ErrorBody,
            routes::geo_routes::GeoResponse,
        )
    ),
    tags(
        (name = "metar map api", description = "aggregates Aviation Weather Center METAR observations for a map UI")
    )
)]
struct ApiDoc;

pub fn build_app_state(
    remote_url: String,
    static_dir: String,
    awc_url: String,
    user_agent: &str,
) -> Result<AppState, anyhow::Error> {
    let metar_source = Arc::new(AwcClient::new(awc_url, user_agent)?);
    Ok(AppState {
        static_dir,
        remote_url,
        geo: Arc::new(GeoTables::new()),
        metar_source,
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let serve_static = ServeDir::new(&app_state.static_dir);
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/metar", get(get_metars))
        .route("/geo", get(get_geo))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .nest_service("/static", serve_static)
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
