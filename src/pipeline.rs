//! Fetch, report and export, in that order.

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::category::Category;
use crate::config::Config;
use crate::fetch::HttpClient;
use crate::leaderboard::LeaderboardClient;
use crate::output::{ExportDocument, build_export, report, write_export};

/// Runs one full pass for `config`, writing user-facing lines to `out`.
///
/// Any fetch failure ends the run before the export file is touched.
pub async fn run<C: HttpClient, W: Write>(
    config: &Config,
    client: &LeaderboardClient<C>,
    out: &mut W,
) -> Result<ExportDocument> {
    if config.username.is_none() {
        warn!("No username configured, no leaderboard entry will match");
    }

    let mut payloads: Vec<(Category, Value)> = Vec::new();

    for &category in &config.categories {
        let payload = match client.fetch(category).await {
            Ok(payload) => payload,
            Err(e) => {
                writeln!(out, "No data retrieved.")?;
                return Err(e).with_context(|| format!("failed to fetch '{category}' leaderboard"));
            }
        };

        match payloads.iter_mut().find(|(c, _)| *c == category) {
            Some(slot) => slot.1 = payload,
            None => payloads.push((category, payload)),
        }
    }
    info!(categories = payloads.len(), "All leaderboards fetched");

    let username = config.username.as_deref();
    writeln!(out, "Output for user {}:", username.unwrap_or_default())?;
    for &category in &config.categories {
        if let Some((_, payload)) = payloads.iter().find(|(c, _)| *c == category) {
            report(out, payload, username, category)?;
        }
    }

    let document = build_export(&payloads, username);
    write_export(&config.output_path, &document)?;
    info!(path = %config.output_path.display(), "Export written");
    writeln!(out, "Successfully updated {}", config.output_file_name())?;

    Ok(document)
}
