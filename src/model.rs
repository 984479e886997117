//! Normalized data model produced by every provider.
//!
//! These are plain values: a [`Post`] for one feed entry, [`Media`] for an
//! attachment, [`PageInfo`] for the account or channel that owns a feed.
//! Numeric statistics are `Option` because providers expose different
//! subsets. `None` means "not exposed", never zero.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single normalized feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Identifier, unique within one provider and path (not globally).
    pub id: String,
    /// Caption or title text.
    pub text: Option<String>,
    /// Publish time. Defaults to fetch time when the source omits it.
    pub published_at: DateTime<Utc>,
    /// Engagement counts the provider disclosed.
    #[serde(default)]
    pub statistics: PostStatistics,
    /// Attachments in source order; may be empty.
    #[serde(default)]
    pub media: Vec<Media>,
}

impl Post {
    /// Create a post with no caption, no media and `published_at` set to now.
    ///
    /// A source without a publish date is stamped with the fetch time rather
    /// than left unknown, so feeds stay sortable by date.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: None,
            published_at: Utc::now(),
            statistics: PostStatistics::default(),
            media: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text;
        self
    }

    /// Set the publish time, keeping the fetch-time default when `None`.
    #[must_use]
    pub fn with_published_at(mut self, published_at: Option<DateTime<Utc>>) -> Self {
        if let Some(ts) = published_at {
            self.published_at = ts;
        }
        self
    }

    #[must_use]
    pub fn with_statistics(mut self, statistics: PostStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    #[must_use]
    pub fn with_media(mut self, media: Vec<Media>) -> Self {
        self.media = media;
        self
    }
}

/// Engagement metrics for a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStatistics {
    pub likes: Option<u64>,
    pub reposts: Option<u64>,
    pub comments: Option<u64>,
    pub views: Option<u64>,
}

/// A media attachment: a resource described by URL, resolved on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Media {
    Image {
        url: String,
        /// Width divided by height.
        aspect_ratio: Option<f64>,
    },
    Video {
        url: String,
        aspect_ratio: Option<f64>,
        duration: Option<Duration>,
    },
    Audio {
        url: String,
        duration: Option<Duration>,
    },
}

impl Media {
    pub fn image(url: impl Into<String>, aspect_ratio: Option<f64>) -> Self {
        Self::Image {
            url: url.into(),
            aspect_ratio,
        }
    }

    pub fn video(url: impl Into<String>, aspect_ratio: Option<f64>) -> Self {
        Self::Video {
            url: url.into(),
            aspect_ratio,
            duration: None,
        }
    }

    pub fn audio(url: impl Into<String>) -> Self {
        Self::Audio {
            url: url.into(),
            duration: None,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Image { url, .. } | Self::Video { url, .. } | Self::Audio { url, .. } => url,
        }
    }

    /// Width / height. Audio has no geometry and always reports `None`.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        match self {
            Self::Image { aspect_ratio, .. } | Self::Video { aspect_ratio, .. } => *aspect_ratio,
            Self::Audio { .. } => None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, new_url: impl Into<String>) -> Self {
        match &mut self {
            Self::Image { url, .. } | Self::Video { url, .. } | Self::Audio { url, .. } => {
                *url = new_url.into();
            }
        }
        self
    }

    /// Replace the aspect ratio. No-op for audio.
    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: Option<f64>) -> Self {
        match &mut self {
            Self::Image { aspect_ratio, .. } | Self::Video { aspect_ratio, .. } => {
                *aspect_ratio = ratio;
            }
            Self::Audio { .. } => {}
        }
        self
    }

    /// `true` when nothing is left for `resolve` to fill in.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        let has_url = !self.url().trim().is_empty();
        match self {
            Self::Audio { .. } => has_url,
            _ => has_url && self.aspect_ratio().is_some(),
        }
    }
}

/// Metadata about the account or channel behind a path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub nick: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub statistics: PageStatistics,
    pub avatar: Option<Media>,
    pub cover: Option<Media>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStatistics {
    pub posts: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
}
