//! Conversion of a raw leaderboard document into typed entries.
//!
//! The endpoint's response has no published schema, so it is received as a
//! [`serde_json::Value`] and checked here once. A document with the wrong
//! overall shape is a [`PayloadError`]. Numeric fields also accept numeric
//! strings and read anything else as absent; entries that are not objects or
//! whose username is not a string are skipped with a warning.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use tracing::warn;

pub const ENTRIES_KEY: &str = "leaderboard_data";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("'leaderboard_data' is missing")]
    MissingEntries,
    #[error("'leaderboard_data' is not a list")]
    EntriesNotAList,
}

/// One user row of a leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub username: Option<String>,
    /// Total distance in meters.
    #[serde(default, deserialize_with = "lenient_length")]
    pub length: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub trips: Option<Number>,
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Number>, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(number_like))
}

fn lenient_length<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(lenient_number(d)?.and_then(|n| n.as_f64()))
}

/// A JSON number, or a string holding one (`"7"`).
fn number_like(value: &Value) -> Option<Number> {
    let number = match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => serde_json::from_str::<Number>(s.trim()).ok(),
        _ => None,
    };
    if number.is_none() {
        warn!(value = %value, "Ignoring non-numeric leaderboard field");
    }
    number
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardPayload {
    pub entries: Vec<LeaderboardEntry>,
}

impl LeaderboardPayload {
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let object = value.as_object().ok_or(PayloadError::NotAnObject)?;
        let raw_entries = object
            .get(ENTRIES_KEY)
            .ok_or(PayloadError::MissingEntries)?
            .as_array()
            .ok_or(PayloadError::EntriesNotAList)?;

        let entries = raw_entries
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                match LeaderboardEntry::deserialize(raw) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        let username = raw.get("username").map(Value::to_string);
                        warn!(
                            index,
                            username = username.as_deref().unwrap_or("<none>"),
                            error = %e,
                            "Skipping unreadable leaderboard entry"
                        );
                        None
                    }
                }
            })
            .collect();

        Ok(Self { entries })
    }

    /// Entries whose username is exactly `username`.
    pub fn entries_for<'a>(
        &'a self,
        username: &'a str,
    ) -> impl Iterator<Item = &'a LeaderboardEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.username.as_deref() == Some(username))
    }

    pub fn find_user(&self, username: &str) -> Option<&LeaderboardEntry> {
        self.entries
            .iter()
            .find(|e| e.username.as_deref() == Some(username))
    }
}
