pub mod geo_routes;
pub mod metar_routes;

pub use geo_routes::*;
pub use metar_routes::*;
