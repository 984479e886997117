//! Error types shared by the fetch client, extraction and providers.
//!
//! Only structural failures live here. "Field not present", "page does not
//! exist" and "one post on the page is broken" are absorbed by returning
//! `None` or skipping, and never surface as a [`SkraperError`].

use http::StatusCode;
use thiserror::Error;

/// Failures that abort the current `get_posts` / `get_page_info` / `resolve` call.
#[derive(Error, Debug)]
pub enum SkraperError {
    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: StatusCode },

    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("config error: {0}")]
    Config(String),
}

impl SkraperError {
    /// Returns `true` for failures raised by the network layer rather than by decoding.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, SkraperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_url_and_code() {
        let err = SkraperError::Status {
            url: "https://ifunny.co/page2".to_string(),
            status: StatusCode::BAD_GATEWAY,
        };
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("https://ifunny.co/page2"));
        assert!(err.is_transport());
    }

    #[test]
    fn json_error_is_not_transport() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SkraperError::Json {
            url: "https://www.reddit.com/r/rust/hot.json".to_string(),
            source,
        };
        assert!(!err.is_transport());
    }
}
