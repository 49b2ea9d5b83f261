//! metar-map core library
//!
//! Shared pieces for the metar-map service:
//! - Configuration loading (XDG-compliant)
//! - Common constants

mod config;

pub use config::{find_config_file, load_config, ConfigSource};

/// Application name used for XDG paths
pub const APP_NAME: &str = "metar-map";

/// Default API listen port
pub const DEFAULT_API_PORT: u16 = 9400;

/// Upstream METAR endpoint on the Aviation Weather Center
pub const DEFAULT_AWC_URL: &str = "https://aviationweather.gov/api/data/metar";

/// Cache freshness window requested from the upstream, in seconds
pub const CACHE_MAX_AGE_SECS: u64 = 300;
