//! Reddit feeds via the public JSON listing API.
//!
//! Any listing URL serves JSON when `.json` is appended. Listings paginate with
//! an opaque `after` token; the feed ends when Reddit stops returning one.
//! Subreddit metadata comes from `/r/{name}/about.json`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::Skraper;
use crate::client::{fetch_json, HttpRequest, SharedClient, SkraperClient};
use crate::error::Result;
use crate::extract::{
    host_matches, json_by_first_path, json_by_path, json_string, json_u64, to_image,
};
use crate::model::{Media, PageInfo, PageStatistics, Post, PostStatistics};
use crate::paginate::{paginate, Page, PostStream};

pub const BASE_URL: &str = "https://www.reddit.com";
const DOMAINS: &[&str] = &["reddit.com", "redd.it", "redditmedia.com"];
const PAGE_SIZE: u32 = 25;

/// Reddit provider.
pub struct RedditSkraper {
    client: SharedClient,
}

/// Listing position: the `after` token of the previous page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RedditCursor {
    after: Option<String>,
}

impl RedditSkraper {
    #[must_use]
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }

    async fn fetch_listing_page(
        &self,
        path: String,
        cursor: RedditCursor,
    ) -> Result<Option<Page<RedditCursor>>> {
        let url = listing_url(&path, &cursor);
        debug!(url = %url, "Fetching Reddit listing page");
        let Some(listing) = fetch_json(self.client.as_ref(), &HttpRequest::get(url)).await? else {
            return Ok(None);
        };
        Ok(parse_listing(&listing))
    }
}

#[async_trait]
impl Skraper for RedditSkraper {
    fn name(&self) -> &'static str {
        "reddit"
    }

    fn base_url(&self) -> &str {
        BASE_URL
    }

    fn client(&self) -> &dyn SkraperClient {
        self.client.as_ref()
    }

    fn supports(&self, media_url: &str) -> bool {
        DOMAINS.iter().any(|domain| host_matches(media_url, domain))
    }

    fn get_posts(&self, path: &str) -> PostStream<'_> {
        let path = normalize_path(path);
        paginate(RedditCursor::default(), move |cursor| {
            self.fetch_listing_page(path.clone(), cursor)
        })
    }

    #[instrument(skip(self))]
    async fn get_page_info(&self, path: &str) -> Result<Option<PageInfo>> {
        let url = format!("{BASE_URL}{}/about.json", normalize_path(path));
        let Some(about) = fetch_json(self.client.as_ref(), &HttpRequest::get(url)).await? else {
            return Ok(None);
        };
        Ok(parse_about(&about))
    }
}

/// `"memes"` → `"/r/memes"`, `"/r/memes/"` → `"/r/memes"`, `.json` stripped.
fn normalize_path(path: &str) -> String {
    let path = path.trim().trim_end_matches('/');
    let path = path.strip_suffix(".json").unwrap_or(path);
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/r/{path}")
    }
}

fn listing_url(path: &str, cursor: &RedditCursor) -> String {
    let mut url = format!("{BASE_URL}{path}.json?limit={PAGE_SIZE}&raw_json=1");
    if let Some(after) = &cursor.after {
        url.push_str("&after=");
        url.push_str(&urlencoding::encode(after));
    }
    url
}

/// `None` when the document is not a listing at all.
fn parse_listing(listing: &Value) -> Option<Page<RedditCursor>> {
    let children = json_by_path(listing, "data.children")?.as_array()?;
    let fragments = children.iter().map(parse_child).collect();
    let next = json_string(listing, "data.after").map(|after| RedditCursor { after: Some(after) });
    Some(Page::new(fragments, next))
}

fn parse_child(child: &Value) -> Option<Post> {
    let data = json_by_path(child, "data")?;
    match RedditPost::deserialize(data) {
        Ok(post) => post.into_post(),
        Err(e) => {
            debug!(error = %e, "Skipping malformed Reddit listing entry");
            None
        }
    }
}

/// Subreddit (`t5`) or user (`t2`) metadata. A user's profile fields live
/// under `data.subreddit`.
fn parse_about(about: &Value) -> Option<PageInfo> {
    let data = json_by_path(about, "data")?;
    let nick = json_by_first_path(
        data,
        &[
            "display_name_prefixed",
            "display_name",
            "subreddit.display_name_prefixed",
            "name",
        ],
    )
    .and_then(Value::as_str)
    .map(str::to_string)?;

    Some(PageInfo {
        nick: Some(nick),
        name: json_string(data, "title").or_else(|| json_string(data, "subreddit.title")),
        description: first_string(
            data,
            &["public_description", "description", "subreddit.public_description"],
        ),
        statistics: PageStatistics {
            posts: None,
            followers: json_u64(data, "subscribers")
                .or_else(|| json_u64(data, "subreddit.subscribers")),
            following: None,
        },
        avatar: first_image(data, &["community_icon", "icon_img", "snoovatar_img"]),
        cover: first_image(
            data,
            &[
                "banner_background_image",
                "banner_img",
                "mobile_banner_image",
                "subreddit.banner_img",
            ],
        ),
    })
}

fn first_string(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| json_string(data, key))
}

/// First non-blank URL among `keys`, HTML entities in the query undone.
fn first_image(data: &Value, keys: &[&str]) -> Option<Media> {
    first_string(data, keys).and_then(|url| to_image(&url.replace("&amp;", "&")))
}

// ============================================================================
// Reddit API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RedditPost {
    id: Option<String>,
    title: Option<String>,
    created_utc: Option<f64>,
    url: Option<String>,
    #[serde(default)]
    is_video: bool,
    media: Option<Value>,
    score: Option<i64>,
    num_comments: Option<u64>,
    preview: Option<RedditPreview>,
}

#[derive(Debug, Deserialize)]
struct RedditPreview {
    #[serde(default)]
    images: Vec<RedditPreviewImage>,
}

#[derive(Debug, Deserialize)]
struct RedditPreviewImage {
    source: Option<RedditImageSource>,
}

#[derive(Debug, Deserialize)]
struct RedditImageSource {
    width: Option<f64>,
    height: Option<f64>,
}

impl RedditPost {
    fn aspect_ratio(&self) -> Option<f64> {
        let source = self.preview.as_ref()?.images.first()?.source.as_ref()?;
        let (width, height) = (source.width?, source.height?);
        (width > 0.0 && height > 0.0).then(|| width / height)
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.created_utc.filter(|s| s.is_finite())?;
        #[allow(clippy::cast_possible_truncation)]
        let secs = secs as i64;
        DateTime::from_timestamp(secs, 0)
    }

    fn into_post(self) -> Option<Post> {
        let id = self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;

        let aspect_ratio = self.aspect_ratio();
        let media = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| {
                if self.is_video || self.media.is_some() {
                    Media::video(url, aspect_ratio)
                } else {
                    Media::image(url, aspect_ratio)
                }
            });

        let statistics = PostStatistics {
            likes: self.score.and_then(|s| u64::try_from(s).ok()),
            reposts: None,
            comments: self.num_comments,
            views: None,
        };

        Some(
            Post::new(id)
                .with_text(self.title.clone().filter(|t| !t.trim().is_empty()))
                .with_published_at(self.published_at())
                .with_statistics(statistics)
                .with_media(media.into_iter().collect()),
        )
    }
}
