//! Upstream payload normalization
//!
//! The AWC METAR endpoint returns loosely-typed JSON; everything here is
//! deliberately permissive. A record only needs a station id to survive,
//! every other field degrades to "absent" instead of failing the batch.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::format;

/// ICAO prefixes for US mainland, Pacific territories, Puerto Rico and the
/// Virgin Islands. Area queries can leak neighboring countries' stations;
/// these are the ones kept.
const DOMESTIC_PREFIXES: [&str; 4] = ["K", "P", "TJ", "TI"];

/// Ceiling/visibility classification as reported upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub enum FlightCategory {
    #[serde(rename = "VFR")]
    Vfr,
    #[serde(rename = "MVFR")]
    Mvfr,
    #[serde(rename = "IFR")]
    Ifr,
    #[serde(rename = "LIFR")]
    Lifr,
    #[default]
    #[serde(rename = "UNK")]
    Unknown,
}

impl FlightCategory {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("VFR") => FlightCategory::Vfr,
            Some("MVFR") => FlightCategory::Mvfr,
            Some("IFR") => FlightCategory::Ifr,
            Some("LIFR") => FlightCategory::Lifr,
            _ => FlightCategory::Unknown,
        }
    }
}

/// Visibility comes back as a number of statute miles or a string,
/// where a trailing `+` means "or greater" (e.g. `"10+"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Visibility {
    StatuteMiles(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCloud {
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub base: Option<i32>,
}

/// One record as it arrives from the upstream, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetar {
    #[serde(rename = "icaoId", default)]
    pub icao_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub dewp: Option<f64>,
    // wdir is "VRB" for variable winds, which maps to absent
    #[serde(default, deserialize_with = "lenient_int")]
    pub wdir: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub wspd: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub wgst: Option<i32>,
    #[serde(default)]
    pub visib: Option<Visibility>,
    #[serde(default)]
    pub altim: Option<f64>,
    #[serde(rename = "fltCat", default)]
    pub flt_cat: Option<String>,
    #[serde(rename = "rawOb", default)]
    pub raw_ob: Option<String>,
    #[serde(rename = "obsTime", default)]
    pub obs_time: Option<i64>,
    #[serde(default)]
    pub clouds: Vec<RawCloud>,
}

/// Accept integers and floats, map anything else (null, "VRB", ...) to None.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .map(|n| n as i32)
        .or_else(|| value.as_f64().map(|f| f.round() as i32)))
}

/// A payload that is not a JSON array counts as zero results; array
/// elements that are not record-shaped are dropped individually.
pub fn parse_records(payload: Value) -> Vec<RawMetar> {
    match payload {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CloudLayer {
    pub cover: String,
    pub base: Option<i32>,
}

/// Human-readable renderings bundled with each observation so the map UI
/// never needs to know about units.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObservationDisplay {
    pub color: &'static str,
    pub visibility: String,
    pub wind: String,
    pub temperature: String,
    pub dew_point: String,
    pub altimeter: String,
    pub observed: String,
}

/// Validated observation, the unit of data the UI renders.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetarObservation {
    pub icao_id: String,
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub temp: Option<f64>,
    pub dewp: Option<f64>,
    pub wdir: Option<i32>,
    pub wspd: Option<i32>,
    pub wgst: Option<i32>,
    pub visib: Option<Visibility>,
    pub altim: Option<f64>,
    pub flt_cat: FlightCategory,
    pub raw_ob: Option<String>,
    pub obs_time: Option<i64>,
    pub clouds: Vec<CloudLayer>,
    pub display: ObservationDisplay,
}

impl MetarObservation {
    /// None when the record has no usable station id.
    pub fn from_raw(raw: RawMetar) -> Option<Self> {
        let icao_id = raw.icao_id?.trim().to_ascii_uppercase();
        if icao_id.is_empty() {
            return None;
        }
        let flt_cat = FlightCategory::parse(raw.flt_cat.as_deref());
        let display = ObservationDisplay {
            color: format::flight_category_color(flt_cat),
            visibility: format::format_visibility(raw.visib.as_ref()),
            wind: format::format_wind(raw.wdir, raw.wspd, raw.wgst),
            temperature: format::format_temperature(raw.temp),
            dew_point: format::format_temperature(raw.dewp),
            altimeter: format::format_altimeter(raw.altim),
            observed: format::format_obs_time(raw.obs_time),
        };
        Some(MetarObservation {
            icao_id,
            name: raw.name,
            lat: raw.lat,
            lon: raw.lon,
            temp: raw.temp,
            dewp: raw.dewp,
            wdir: raw.wdir,
            wspd: raw.wspd,
            wgst: raw.wgst,
            visib: raw.visib,
            altim: raw.altim,
            flt_cat,
            raw_ob: raw.raw_ob,
            obs_time: raw.obs_time,
            clouds: raw
                .clouds
                .into_iter()
                .filter_map(|c| {
                    c.cover.map(|cover| CloudLayer {
                        cover,
                        base: c.base,
                    })
                })
                .collect(),
            display,
        })
    }

    fn is_domestic(&self) -> bool {
        DOMESTIC_PREFIXES
            .iter()
            .any(|prefix| self.icao_id.starts_with(prefix))
    }
}

/// Validate and clean the merged upstream records.
///
/// Records without a station id are dropped, duplicates keep their first
/// occurrence (the merge preserves chunk order, so this is deterministic),
/// and area-resolved queries additionally drop non-domestic stations.
pub fn normalize(records: Vec<RawMetar>, area_query: bool) -> Vec<MetarObservation> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter_map(MetarObservation::from_raw)
        .filter(|obs| !area_query || obs.is_domestic())
        .filter(|obs| seen.insert(obs.icao_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(id: &str) -> RawMetar {
        RawMetar {
            icao_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn non_array_payload_counts_as_zero_results() {
        assert!(parse_records(json!({"error": "boom"})).is_empty());
        assert!(parse_records(json!("nope")).is_empty());
        assert!(parse_records(json!(null)).is_empty());
    }

    #[test]
    fn record_with_null_fields_still_parses() {
        let records = parse_records(json!([{
            "icaoId": "KBOS",
            "name": null,
            "temp": null,
            "wdir": "VRB",
            "visib": "10+",
            "clouds": [{"cover": "FEW", "base": null}]
        }]));
        assert_eq!(records.len(), 1);
        let obs = MetarObservation::from_raw(records[0].clone()).unwrap();
        assert_eq!(obs.icao_id, "KBOS");
        assert_eq!(obs.wdir, None);
        assert_eq!(obs.visib, Some(Visibility::Text("10+".into())));
        assert_eq!(obs.clouds[0].cover, "FEW");
        assert_eq!(obs.clouds[0].base, None);
    }

    #[test]
    fn numeric_visibility_parses_as_miles() {
        let records = parse_records(json!([{"icaoId": "KSEA", "visib": 10}]));
        let obs = MetarObservation::from_raw(records[0].clone()).unwrap();
        assert_eq!(obs.visib, Some(Visibility::StatuteMiles(10.0)));
    }

    #[test]
    fn record_without_station_id_is_dropped() {
        let records = parse_records(json!([{"name": "nowhere"}, 42]));
        assert_eq!(normalize(records, false).len(), 0);
    }

    #[test]
    fn area_filter_keeps_only_domestic_prefixes() {
        let records = vec![raw("KJFK"), raw("CYYZ"), raw("TJSJ"), raw("MMMX")];
        let kept: Vec<String> = normalize(records, true)
            .into_iter()
            .map(|o| o.icao_id)
            .collect();
        assert_eq!(kept, vec!["KJFK".to_string(), "TJSJ".to_string()]);
    }

    #[test]
    fn station_queries_are_not_post_filtered() {
        let records = vec![raw("CYYZ"), raw("MMMX")];
        assert_eq!(normalize(records, false).len(), 2);
    }

    #[test]
    fn duplicate_station_keeps_first_occurrence() {
        let mut first = raw("KORD");
        first.temp = Some(10.0);
        let mut second = raw("KORD");
        second.temp = Some(99.0);
        let merged = normalize(vec![first, second], false);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].temp, Some(10.0));
    }

    #[test]
    fn flight_category_parses_known_values_only() {
        assert_eq!(FlightCategory::parse(Some("VFR")), FlightCategory::Vfr);
        assert_eq!(FlightCategory::parse(Some("LIFR")), FlightCategory::Lifr);
        assert_eq!(FlightCategory::parse(Some("WOAH")), FlightCategory::Unknown);
        assert_eq!(FlightCategory::parse(None), FlightCategory::Unknown);
    }

    #[test]
    fn observation_serializes_with_upstream_field_names() {
        let obs = MetarObservation::from_raw(raw("KJFK")).unwrap();
        let value = serde_json::to_value(&obs).unwrap();
        assert_eq!(value["icaoId"], "KJFK");
        assert_eq!(value["fltCat"], "UNK");
        assert_eq!(value["display"]["wind"], "Calm");
    }
}
