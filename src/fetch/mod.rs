//! HTTP plumbing: the [`HttpClient`] seam, a reqwest implementation and a
//! JSON GET helper that classifies every way a request can fail.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

/// Body characters kept when the server answers with a non-200 status.
pub const STATUS_SNIPPET_CHARS: usize = 500;
/// Body characters kept when a 200 response is not valid JSON.
pub const JSON_SNIPPET_CHARS: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status}: {snippet}")]
    Status { status: StatusCode, snippet: String },

    #[error("response is not JSON ({source}): {snippet}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        snippet: String,
    },
}

/// Issues a GET and parses a 200 response body as JSON.
///
/// Any other status is an error, even other 2xx codes.
pub async fn fetch_json<C: HttpClient>(client: &C, url: &str) -> Result<Value, FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?;
    let status = resp.status();
    let body = resp.text().await?;
    debug!(%status, bytes = body.len(), "Response received");

    if status != StatusCode::OK {
        return Err(FetchError::Status {
            status,
            snippet: snippet(&body, STATUS_SNIPPET_CHARS),
        });
    }

    serde_json::from_str(&body).map_err(|source| FetchError::InvalidJson {
        source,
        snippet: snippet(&body, JSON_SNIPPET_CHARS),
    })
}

/// First `max_chars` characters of `body`, cut on a char boundary.
pub fn snippet(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
