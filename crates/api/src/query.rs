//! Query resolution
//!
//! Turns an inbound request (explicit ids, state list, region key, raw
//! bounding box, or nothing) into either a canonical station list or a
//! single bounding box for the upstream call.

use std::collections::HashSet;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::geo::{BoundingBox, GeoTables, DEFAULT_AIRPORTS};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Raw query parameters as they arrive on `GET /metar`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MetarParams {
    /// Comma-separated ICAO station ids (e.g. `KJFK,KBOS`)
    pub ids: Option<String>,
    /// Comma-separated state codes (e.g. `RI,MA`)
    pub states: Option<String>,
    /// Region key (e.g. `northeast`)
    pub region: Option<String>,
    /// Bounding box `south,west,north,east` in degrees
    pub bbox: Option<String>,
}

/// One request, exactly one discriminant.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySpec {
    Ids(String),
    States(String),
    Region(String),
    Bbox(String),
    Default,
}

impl QuerySpec {
    /// Applies the fixed precedence once, up front:
    /// ids > states > region > bbox > default.
    pub fn from_params(params: &MetarParams) -> Self {
        fn given(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        if let Some(ids) = given(&params.ids) {
            QuerySpec::Ids(ids.to_string())
        } else if let Some(states) = given(&params.states) {
            QuerySpec::States(states.to_string())
        } else if let Some(region) = given(&params.region) {
            QuerySpec::Region(region.to_string())
        } else if let Some(bbox) = given(&params.bbox) {
            QuerySpec::Bbox(bbox.to_string())
        } else {
            QuerySpec::Default
        }
    }

    /// True for explicit station-id requests, which get the
    /// "no data found" treatment when the upstream returns nothing.
    pub fn is_explicit_ids(&self) -> bool {
        matches!(self, QuerySpec::Ids(_))
    }
}

/// What actually goes upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedQuery {
    Stations(Vec<String>),
    Area(BoundingBox),
}

pub fn resolve(spec: &QuerySpec, geo: &GeoTables) -> Result<ResolvedQuery, Error> {
    match spec {
        QuerySpec::Ids(raw) => Ok(ResolvedQuery::Stations(clean_ids(raw))),
        QuerySpec::States(raw) => {
            let codes = raw.split(',').map(str::trim).filter(|s| !s.is_empty());
            geo.combine_states(codes)
                .map(ResolvedQuery::Area)
                .ok_or_else(|| {
                    Error::InvalidInput(format!("no recognized state codes in '{}'", raw))
                })
        }
        QuerySpec::Region(key) => {
            let region = geo
                .region(key)
                .ok_or_else(|| Error::InvalidInput(format!("unknown region '{}'", key)))?;
            Ok(ResolvedQuery::Area(region.bbox))
        }
        QuerySpec::Bbox(raw) => parse_bbox(raw).map(ResolvedQuery::Area),
        QuerySpec::Default => Ok(ResolvedQuery::Stations(
            DEFAULT_AIRPORTS.iter().map(|id| id.to_string()).collect(),
        )),
    }
}

/// Split on comma, trim, uppercase, dedupe preserving first-seen order.
fn clean_ids(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(|token| token.trim().to_ascii_uppercase())
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect()
}

/// At least four comma-separated numbers, in order south, west, north,
/// east. Extra tokens are ignored and no range clamping is applied;
/// coordinate sanity is the caller's problem.
fn parse_bbox(raw: &str) -> Result<BoundingBox, Error> {
    let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
    if tokens.len() < 4 {
        return Err(Error::InvalidInput(format!(
            "bbox needs four coordinates, got {}",
            tokens.len()
        )));
    }
    let mut coords = [0f64; 4];
    for (slot, token) in coords.iter_mut().zip(&tokens) {
        *slot = token
            .parse()
            .map_err(|_| Error::InvalidInput(format!("bbox coordinate '{}' is not a number", token)))?;
    }
    Ok(BoundingBox::new(coords[0], coords[1], coords[2], coords[3]))
}
