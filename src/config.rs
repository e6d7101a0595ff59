//! Run configuration, built once at startup.
//!
//! Values come from a lookup function so the process environment is only read
//! in [`Config::from_env`]. Invalid values never fail the load; they fall back
//! to defaults with a warning.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::category::{Category, parse_types};

pub const DEFAULT_BASE_URL: &str = "https://trainlog.me";
pub const DEFAULT_OUTPUT_FILE: &str = "output.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Leaderboard username to look up. Missing is allowed; nothing will match.
    pub username: Option<String>,
    pub output_path: PathBuf,
    pub categories: Vec<Category>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            categories: vec![Category::All],
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(mut get: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let username = get("TRAINLOG_USERNAME")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let output_path = get("TRAINLOG_OUTPUT_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));

        let categories = parse_types(&get("TRAINLOG_TYPES").unwrap_or_default());

        let base_url = get("TRAINLOG_BASE_URL")
            .map(|u| normalize_base_url(&u))
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match get("TRAINLOG_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %raw, "Invalid TRAINLOG_TIMEOUT_SECS, using default");
                    DEFAULT_TIMEOUT
                }
            },
        };

        Self {
            username,
            output_path,
            categories,
            base_url,
            timeout,
        }
    }

    /// Name of the output file without its directory, for status messages.
    pub fn output_file_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string())
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
