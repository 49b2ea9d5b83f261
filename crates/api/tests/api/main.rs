mod geo;
mod helpers;
mod metar;
