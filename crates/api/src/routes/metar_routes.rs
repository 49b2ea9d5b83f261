use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::Serialize;
use utoipa::ToSchema;

use crate::fetch::fetch_observations;
use crate::observations::normalize;
use crate::query::{self, resolve, MetarParams, QuerySpec, ResolvedQuery};
use crate::startup::AppState;

/// Structured error payload; the UI never sees a raw exception.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/metar",
    params(MetarParams),
    responses(
        (status = OK, description = "Latest observations for the requested airports (or a no-data message for an explicit id search that matched nothing)", body = Vec<crate::observations::MetarObservation>),
        (status = BAD_REQUEST, description = "Unknown region, no valid state codes, or malformed bounding box", body = ErrorBody),
        (status = BAD_GATEWAY, description = "Every upstream call failed", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Unexpected failure", body = ErrorBody),
    )
)]
pub async fn get_metars(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MetarParams>,
) -> Result<Response, ApiError> {
    let spec = QuerySpec::from_params(&params);
    let resolved = resolve(&spec, &state.geo).map_err(|e| match e {
        query::Error::InvalidInput(msg) => {
            error!("query rejected: {}", msg);
            api_error(StatusCode::BAD_REQUEST, msg)
        }
    })?;

    let report = fetch_observations(state.metar_source.as_ref(), &resolved).await;
    if report.all_chunks_failed() {
        error!(
            "all {} upstream calls failed: {}",
            report.chunk_count, report.failures[0].reason
        );
        return Err(api_error(
            StatusCode::BAD_GATEWAY,
            "weather source unavailable",
        ));
    }

    let area_query = matches!(resolved, ResolvedQuery::Area(_));
    let observations = normalize(report.records, area_query);

    // An explicit id search that resolved and fetched fine but matched
    // nothing gets a user-visible message rather than an error status.
    if observations.is_empty() && spec.is_explicit_ids() {
        if let ResolvedQuery::Stations(ids) = &resolved {
            return Ok(Json(ErrorBody {
                error: format!("No data found for {}", ids.join(", ")),
            })
            .into_response());
        }
    }

    Ok(Json(observations).into_response())
}
