use serde::Serialize;
use serde_json::Number;

use crate::payload::LeaderboardEntry;

/// Per-category result for the configured user, as written to the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStat {
    pub km: i64,
    pub trips: Number,
}

impl UserStat {
    /// Missing `length` or `trips` count as zero.
    pub fn from_entry(entry: &LeaderboardEntry) -> Self {
        UserStat {
            km: meters_to_km(entry.length.unwrap_or(0.0)),
            trips: entry.trips.clone().unwrap_or_else(|| Number::from(0)),
        }
    }
}

/// Meters to whole kilometers, ties rounded to even (12.5 km -> 12).
pub fn meters_to_km(meters: f64) -> i64 {
    (meters / 1_000.0).round_ties_even() as i64
}

/// Kilometers for console display; `N/A` when the length is absent or zero.
pub fn display_km(entry: &LeaderboardEntry) -> String {
    match entry.length {
        Some(length) if length != 0.0 => meters_to_km(length).to_string(),
        _ => "N/A".to_string(),
    }
}

pub fn display_trips(entry: &LeaderboardEntry) -> String {
    entry
        .trips
        .as_ref()
        .map(Number::to_string)
        .unwrap_or_else(|| "N/A".to_string())
}
