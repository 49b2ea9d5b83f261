//! Display formatters
//!
//! Pure functions turning raw observation fields into the strings the map
//! UI shows. Absent values render as "--" (or "Calm" for wind); nothing
//! here can fail.

use time::{macros::format_description, OffsetDateTime};

use crate::observations::{FlightCategory, Visibility};

/// Marker color for a flight category.
pub fn flight_category_color(category: FlightCategory) -> &'static str {
    match category {
        FlightCategory::Vfr => "#22c55e",
        FlightCategory::Mvfr => "#3b82f6",
        FlightCategory::Ifr => "#ef4444",
        FlightCategory::Lifr => "#a855f7",
        FlightCategory::Unknown => "#6b7280",
    }
}

/// `10` -> "10 SM", `"10+"` -> "10+ SM" (with a space after the plus).
pub fn format_visibility(visib: Option<&Visibility>) -> String {
    match visib {
        None => "--".to_string(),
        Some(Visibility::StatuteMiles(miles)) => format!("{} SM", miles),
        Some(Visibility::Text(text)) => format!("{} SM", text.replace('+', "+ ")),
    }
}

/// "Calm" when direction or speed is unreported or the speed is zero,
/// otherwise e.g. "270° @ 15 kt G25".
pub fn format_wind(wdir: Option<i32>, wspd: Option<i32>, wgst: Option<i32>) -> String {
    let (dir, speed) = match (wdir, wspd) {
        (Some(dir), Some(speed)) if speed != 0 => (dir, speed),
        _ => return "Calm".to_string(),
    };
    let mut wind = format!("{:03}° @ {} kt", dir, speed);
    if let Some(gust) = wgst.filter(|g| *g != 0) {
        wind.push_str(&format!(" G{}", gust));
    }
    wind
}

/// Nearest-integer Celsius.
pub fn format_temperature(temp: Option<f64>) -> String {
    match temp {
        Some(t) => format!("{}°C", t.round() as i64),
        None => "--".to_string(),
    }
}

/// Values above 100 are taken to be hectopascals and converted to inches
/// of mercury; anything else is assumed to already be inHg.
pub fn format_altimeter(altim: Option<f64>) -> String {
    match altim {
        Some(raw) => {
            let in_hg = if raw > 100.0 { raw * 0.02953 } else { raw };
            format!("{:.2}\"", in_hg)
        }
        None => "--".to_string(),
    }
}

/// Unix epoch seconds to "HH:MM UTC". The browser is welcome to re-render
/// in the viewer's zone; the server reports UTC.
pub fn format_obs_time(obs_time: Option<i64>) -> String {
    let fmt = format_description!("[hour]:[minute] UTC");
    obs_time
        .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok())
        .and_then(|dt| dt.format(&fmt).ok())
        .unwrap_or_else(|| "--".to_string())
}
