//! Static geographic reference tables
//!
//! State and region bounding boxes plus the default airport set. Built once
//! at startup and shared read-only through `AppState`; none of this changes
//! at runtime.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// Rectangular geographic area, degrees. Serialized as
/// `[south, west, north, east]` to match the upstream convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Smallest box containing both `self` and `other`,
    /// min of mins and max of maxes per axis.
    pub fn enclose(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    /// Upstream query form: `minLat,minLon,maxLat,maxLon`
    pub fn to_query(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(4)?;
        tup.serialize_element(&self.south)?;
        tup.serialize_element(&self.west)?;
        tup.serialize_element(&self.north)?;
        tup.serialize_element(&self.east)?;
        tup.end()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StateInfo {
    pub code: &'static str,
    pub name: &'static str,
    #[schema(value_type = Vec<f64>)]
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegionInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub states: Vec<&'static str>,
    #[schema(value_type = Vec<f64>)]
    pub bbox: BoundingBox,
}

/// Popular airports for the default view (fast initial load)
pub const DEFAULT_AIRPORTS: [&str; 20] = [
    "KJFK", "KLAX", "KORD", "KATL", "KDFW", "KDEN", "KSFO", "KLAS", "KMIA", "KSEA", "KBOS",
    "KMSP", "KDTW", "KPHL", "KPHX", "KIAH", "KMCO", "KEWR", "KSLC", "KSAN",
];

type StateRow = (&'static str, &'static str, [f64; 4]);

#[rustfmt::skip]
const STATES: [StateRow; 50] = [
    ("AL", "Alabama",        [30.22, -88.47, 35.01, -84.89]),
    ("AK", "Alaska",         [51.21, -179.15, 71.39, -129.98]),
    ("AZ", "Arizona",        [31.33, -114.81, 37.00, -109.04]),
    ("AR", "Arkansas",       [33.00, -94.62, 36.50, -89.64]),
    ("CA", "California",     [32.53, -124.48, 42.01, -114.13]),
    ("CO", "Colorado",       [36.99, -109.06, 41.00, -102.04]),
    ("CT", "Connecticut",    [40.95, -73.73, 42.05, -71.79]),
    ("DE", "Delaware",       [38.45, -75.79, 39.84, -75.05]),
    ("FL", "Florida",        [24.40, -87.63, 31.00, -80.03]),
    ("GA", "Georgia",        [30.36, -85.61, 35.00, -80.84]),
    ("HI", "Hawaii",         [18.91, -160.25, 22.24, -154.81]),
    ("ID", "Idaho",          [41.99, -117.24, 49.00, -111.04]),
    ("IL", "Illinois",       [36.97, -91.51, 42.51, -87.02]),
    ("IN", "Indiana",        [37.77, -88.10, 41.76, -84.78]),
    ("IA", "Iowa",           [40.38, -96.64, 43.50, -90.14]),
    ("KS", "Kansas",         [36.99, -102.05, 40.00, -94.59]),
    ("KY", "Kentucky",       [36.50, -89.57, 39.15, -81.96]),
    ("LA", "Louisiana",      [28.93, -94.04, 33.02, -88.82]),
    ("ME", "Maine",          [43.06, -71.08, 47.46, -66.95]),
    ("MD", "Maryland",       [37.91, -79.49, 39.72, -75.05]),
    ("MA", "Massachusetts",  [41.24, -73.50, 42.89, -69.93]),
    ("MI", "Michigan",       [41.70, -90.42, 48.19, -82.41]),
    ("MN", "Minnesota",      [43.50, -97.24, 49.38, -89.49]),
    ("MS", "Mississippi",    [30.17, -91.66, 35.00, -88.10]),
    ("MO", "Missouri",       [35.99, -95.77, 40.61, -89.10]),
    ("MT", "Montana",        [44.36, -116.05, 49.00, -104.04]),
    ("NE", "Nebraska",       [40.00, -104.05, 43.00, -95.31]),
    ("NV", "Nevada",         [35.00, -120.01, 42.00, -114.04]),
    ("NH", "New Hampshire",  [42.70, -72.56, 45.31, -70.70]),
    ("NJ", "New Jersey",     [38.93, -75.56, 41.36, -73.89]),
    ("NM", "New Mexico",     [31.33, -109.05, 37.00, -103.00]),
    ("NY", "New York",       [40.50, -79.76, 45.02, -71.86]),
    ("NC", "North Carolina", [33.84, -84.32, 36.59, -75.46]),
    ("ND", "North Dakota",   [45.94, -104.05, 49.00, -96.55]),
    ("OH", "Ohio",           [38.40, -84.82, 42.00, -80.52]),
    ("OK", "Oklahoma",       [33.62, -103.00, 37.00, -94.43]),
    ("OR", "Oregon",         [41.99, -124.57, 46.29, -116.46]),
    ("PA", "Pennsylvania",   [39.72, -80.52, 42.27, -74.69]),
    ("RI", "Rhode Island",   [41.15, -71.86, 42.02, -71.12]),
    ("SC", "South Carolina", [32.03, -83.35, 35.22, -78.54]),
    ("SD", "South Dakota",   [42.48, -104.06, 45.95, -96.44]),
    ("TN", "Tennessee",      [34.98, -90.31, 36.68, -81.65]),
    ("TX", "Texas",          [25.84, -106.65, 36.50, -93.51]),
    ("UT", "Utah",           [36.99, -114.05, 42.00, -109.04]),
    ("VT", "Vermont",        [42.73, -73.44, 45.02, -71.46]),
    ("VA", "Virginia",       [36.54, -83.68, 39.47, -75.24]),
    ("WA", "Washington",     [45.54, -124.85, 49.00, -116.92]),
    ("WV", "West Virginia",  [37.20, -82.64, 40.64, -77.72]),
    ("WI", "Wisconsin",      [42.49, -92.89, 47.08, -86.25]),
    ("WY", "Wyoming",        [40.99, -111.06, 45.01, -104.05]),
];

type RegionRow = (&'static str, &'static str, &'static [&'static str]);

const REGIONS: [RegionRow; 7] = [
    (
        "northeast",
        "Northeast",
        &["CT", "DE", "MA", "MD", "ME", "NH", "NJ", "NY", "PA", "RI", "VT"],
    ),
    (
        "southeast",
        "Southeast",
        &["AL", "FL", "GA", "KY", "MS", "NC", "SC", "TN", "VA", "WV"],
    ),
    (
        "midwest",
        "Midwest",
        &["IA", "IL", "IN", "KS", "MI", "MN", "MO", "ND", "NE", "OH", "SD", "WI"],
    ),
    ("southwest", "Southwest", &["AZ", "NM", "OK", "TX"]),
    (
        "west",
        "West",
        &["CA", "CO", "ID", "MT", "NV", "OR", "UT", "WA", "WY"],
    ),
    ("alaska", "Alaska", &["AK"]),
    ("hawaii", "Hawaii", &["HI"]),
];

/// The full reference table, built once at startup. Region boxes are derived
/// from their member states here so they can never drift from the state table.
pub struct GeoTables {
    states: Vec<StateInfo>,
    regions: Vec<RegionInfo>,
}

impl GeoTables {
    pub fn new() -> Self {
        let states: Vec<StateInfo> = STATES
            .iter()
            .map(|&(code, name, [s, w, n, e])| StateInfo {
                code,
                name,
                bbox: BoundingBox::new(s, w, n, e),
            })
            .collect();

        let regions = REGIONS
            .iter()
            .map(|&(id, name, members)| {
                let bbox = members
                    .iter()
                    .map(|code| {
                        states
                            .iter()
                            .find(|s| s.code == *code)
                            .unwrap_or_else(|| panic!("region {} references unknown state {}", id, code))
                            .bbox
                    })
                    .reduce(|acc, b| acc.enclose(&b))
                    .expect("region has at least one member state");
                RegionInfo {
                    id,
                    name,
                    states: members.to_vec(),
                    bbox,
                }
            })
            .collect();

        Self { states, regions }
    }

    pub fn states(&self) -> &[StateInfo] {
        &self.states
    }

    pub fn regions(&self) -> &[RegionInfo] {
        &self.regions
    }

    pub fn state(&self, code: &str) -> Option<&StateInfo> {
        self.states
            .iter()
            .find(|s| s.code.eq_ignore_ascii_case(code.trim()))
    }

    pub fn region(&self, key: &str) -> Option<&RegionInfo> {
        self.regions
            .iter()
            .find(|r| r.id.eq_ignore_ascii_case(key.trim()))
    }

    /// Enclosing box of every recognized state code in `codes`.
    /// Unknown codes are skipped; `None` when nothing matched.
    pub fn combine_states<'a, I>(&self, codes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = &'a str>,
    {
        codes
            .into_iter()
            .filter_map(|code| self.state(code))
            .map(|s| s.bbox)
            .reduce(|acc, b| acc.enclose(&b))
    }
}

impl Default for GeoTables {
    fn default() -> Self {
        Self::new()
    }
}
