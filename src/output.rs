//! Console summary and JSON export of the configured user's stats.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::category::Category;
use crate::payload::LeaderboardPayload;
use crate::stats::{UserStat, display_km, display_trips};

/// Writes the summary lines for one category.
///
/// A payload with the wrong shape is dumped for diagnosis instead of being
/// treated as an error.
pub fn report<W: Write>(
    out: &mut W,
    payload: &Value,
    username: Option<&str>,
    category: Category,
) -> io::Result<()> {
    let parsed = match LeaderboardPayload::from_value(payload) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(%category, error = %e, "Unexpected leaderboard payload");
            writeln!(
                out,
                "Incorrect file structure or 'leaderboard_data' is missing:"
            )?;
            let dump = serde_json::to_string_pretty(payload).map_err(io::Error::other)?;
            writeln!(out, "{dump}")?;
            return Ok(());
        }
    };

    let user = username.unwrap_or_default();
    let matches: Vec<_> = match username {
        Some(u) => parsed.entries_for(u).collect(),
        None => Vec::new(),
    };
    let found = !matches.is_empty();
    for entry in matches {
        writeln!(
            out,
            "Type: {category} — km: {} — trips: {}",
            display_km(entry),
            display_trips(entry)
        )?;
    }

    if !found {
        info!(%category, username = user, "User not on leaderboard");
        writeln!(out, "Couldn't find results for '{user}'.")?;
    }

    Ok(())
}

/// First matching entry of `payload` as a [`UserStat`], or `None` when the
/// payload is unreadable or the user is absent.
pub fn extract_user_stat(payload: &Value, username: Option<&str>) -> Option<UserStat> {
    let username = username?;
    let parsed = LeaderboardPayload::from_value(payload).ok()?;
    parsed.find_user(username).map(UserStat::from_entry)
}

/// Category name to stat, kept in the order categories were first fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportDocument {
    pub entries: Vec<(Category, Option<UserStat>)>,
}

impl Serialize for ExportDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, stat) in &self.entries {
            map.serialize_entry(category.name(), stat)?;
        }
        map.end()
    }
}

pub fn build_export(payloads: &[(Category, Value)], username: Option<&str>) -> ExportDocument {
    ExportDocument {
        entries: payloads
            .iter()
            .map(|(category, payload)| (*category, extract_user_stat(payload, username)))
            .collect(),
    }
}

/// Writes the export as 2-space indented JSON, replacing any existing file.
pub fn write_export(path: &Path, document: &ExportDocument) -> Result<()> {
    debug!(path = %path.display(), "Writing export");

    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.flush()?;

    Ok(())
}
