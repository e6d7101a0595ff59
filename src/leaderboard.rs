//! Client for the trainlog `getLeaderboardUsers` endpoint.

use serde_json::Value;
use tracing::{error, info};

use crate::category::Category;
use crate::config::normalize_base_url;
use crate::fetch::{FetchError, HttpClient, fetch_json};

pub const LEADERBOARD_PATH: &str = "/getLeaderboardUsers/";

pub struct LeaderboardClient<C> {
    http: C,
    base_url: String,
}

impl<C: HttpClient> LeaderboardClient<C> {
    pub fn new(http: C, base_url: &str) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn url_for(&self, category: Category) -> String {
        format!("{}{}{}", self.base_url, LEADERBOARD_PATH, category.path())
    }

    /// Fetches the raw leaderboard document for one category.
    ///
    /// Failures are logged here with the category and URL before being
    /// returned, so callers only decide whether to continue.
    #[tracing::instrument(skip(self, category), fields(category = %category))]
    pub async fn fetch(&self, category: Category) -> Result<Value, FetchError> {
        let url = self.url_for(category);
        info!(url = %url, "Fetching leaderboard");

        match fetch_json(&self.http, &url).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                match &e {
                    FetchError::Status { status, snippet } => {
                        error!(url = %url, %status, snippet = %snippet, "Couldn't get leaderboard");
                    }
                    FetchError::InvalidJson { snippet, .. } => {
                        error!(url = %url, snippet = %snippet, "Leaderboard response is not JSON");
                    }
                    other => {
                        error!(url = %url, error = %other, "Couldn't get leaderboard");
                    }
                }
                Err(e)
            }
        }
    }
}
