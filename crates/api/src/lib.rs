pub mod awc;
pub mod fetch;
pub mod format;
pub mod geo;
pub mod observations;
pub mod query;
pub mod routes;
pub mod startup;
pub mod utils;

pub use awc::{AwcClient, MetarSource};
pub use fetch::{fetch_observations, FetchReport, MAX_IDS_PER_CALL};
pub use geo::{BoundingBox, GeoTables, DEFAULT_AIRPORTS};
pub use observations::{normalize, FlightCategory, MetarObservation, RawMetar, Visibility};
pub use query::{resolve, MetarParams, QuerySpec, ResolvedQuery};
pub use startup::{app, build_app_state, AppState};
pub use utils::{get_config_info, get_log_level, setup_logger, Cli};
