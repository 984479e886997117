//! IFunny feeds scraped from server-rendered HTML.
//!
//! Feed pages list posts as `.stream__item` elements and paginate with a
//! `/pageN` suffix (`/featured/page1`, `/featured/page2`, …). User pages are
//! a single page. Account metadata is read from the
//! `window.__INITIAL_STATE__` JSON blob embedded in the profile page.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::ElementRef;
use serde_json::Value;
use tracing::{debug, instrument};

use super::Skraper;
use crate::client::{HttpRequest, SharedClient, SkraperClient};
use crate::error::Result;
use crate::extract::{
    attr, build_full_url, elements_by_class, elements_by_tag, first_element_by_tag, host_matches,
    inverse_ratio, json_by_first_path, json_by_path, json_string, json_u64, last_path_segment,
    parse_document, text, to_image,
};
use crate::model::{Media, PageInfo, PageStatistics, Post};
use crate::paginate::{next_page_path, paged_path, paginate, Page, PostStream};

pub const BASE_URL: &str = "https://ifunny.co";
const DOMAIN: &str = "ifunny.co";
const PAGE_MARKER: &str = "/page";
const POST_CLASS: &str = "stream__item";

static INITIAL_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"__INITIAL_STATE__\s*=\s*").expect("initial state pattern should compile")
});

/// IFunny provider.
pub struct IFunnySkraper {
    client: SharedClient,
}

impl IFunnySkraper {
    #[must_use]
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }

    async fn fetch_html(&self, path: &str) -> Result<Option<String>> {
        let url = build_full_url(BASE_URL, path);
        self.client.request(&HttpRequest::get(url)).await
    }

    async fn fetch_feed_page(&self, path: String) -> Result<Option<Page<String>>> {
        debug!(path = %path, "Fetching IFunny feed page");
        let Some(html) = self.fetch_html(&path).await? else {
            return Ok(None);
        };
        Ok(Some(parse_feed_page(&html, &path)))
    }
}

#[async_trait]
impl Skraper for IFunnySkraper {
    fn name(&self) -> &'static str {
        "ifunny"
    }

    fn base_url(&self) -> &str {
        BASE_URL
    }

    fn client(&self) -> &dyn SkraperClient {
        self.client.as_ref()
    }

    fn supports(&self, media_url: &str) -> bool {
        host_matches(media_url, DOMAIN)
    }

    fn get_posts(&self, path: &str) -> PostStream<'_> {
        paginate(first_page_path(path), move |path| self.fetch_feed_page(path))
    }

    #[instrument(skip(self))]
    async fn get_page_info(&self, path: &str) -> Result<Option<PageInfo>> {
        let Some(html) = self.fetch_html(path).await? else {
            return Ok(None);
        };
        Ok(extract_initial_state(&html)
            .and_then(|state| IFunnyUser::from_state(&state))
            .map(IFunnyUser::into_page_info))
    }
}

/// User pages are not paginated; everything else starts at `/page1`.
fn first_page_path(path: &str) -> String {
    if path.starts_with("/user") {
        path.to_string()
    } else {
        paged_path(path, PAGE_MARKER)
    }
}

fn parse_feed_page(html: &str, path: &str) -> Page<String> {
    let document = parse_document(html);
    let fragments = elements_by_class(document.root_element(), POST_CLASS)
        .into_iter()
        .map(parse_post)
        .collect();
    Page::new(fragments, next_page_path(path, PAGE_MARKER))
}

/// Map one `.stream__item`. `None` when the item has no link or no media URL.
fn parse_post(item: ElementRef<'_>) -> Option<Post> {
    let link_el = first_element_by_tag(item, "a")?;
    let link = attr(link_el, "href")?;
    let id = last_path_segment(link)?;
    let img = first_element_by_tag(link_el, "img");

    let aspect_ratio = attr(item, "data-ratio").and_then(inverse_ratio);
    let media = if link.contains("video") || link.contains("gif") {
        Media::video(build_full_url(BASE_URL, link), aspect_ratio)
    } else {
        let src = img.and_then(|img| attr(img, "data-src").or_else(|| attr(img, "src")))?;
        Media::image(src, aspect_ratio)
    };

    let caption = img
        .and_then(|img| attr(img, "alt"))
        .map(str::to_string)
        .or_else(|| text(item));

    Some(Post::new(id).with_text(caption).with_media(vec![media]))
}

/// Locate and decode `window.__INITIAL_STATE__ = {...};`.
///
/// Only the first JSON value after the assignment is read, so statements
/// following it in the same script are ignored.
fn extract_initial_state(html: &str) -> Option<Value> {
    let document = parse_document(html);
    elements_by_tag(document.root_element(), "script")
        .into_iter()
        .map(|script| script.text().collect::<String>())
        .filter(|code| code.contains("__INITIAL_STATE__"))
        .find_map(|code| {
            let start = INITIAL_STATE.find(&code)?.end();
            let state = serde_json::Deserializer::from_str(&code[start..])
                .into_iter::<Value>()
                .next()?
                .ok()?;
            state.is_object().then_some(state)
        })
}

/// Profile fields as laid out under `user.data` in the initial state.
#[derive(Debug, Clone, PartialEq)]
struct IFunnyUser {
    nick: String,
    about: Option<String>,
    total_posts: Option<u64>,
    subscribers: Option<u64>,
    subscriptions: Option<u64>,
    avatar_url: Option<String>,
    cover_url: Option<String>,
}

impl IFunnyUser {
    fn from_state(state: &Value) -> Option<Self> {
        let user = json_by_path(state, "user.data")?;
        Some(Self {
            nick: json_string(user, "nick")?,
            about: json_string(user, "about"),
            total_posts: json_u64(user, "num.total_posts"),
            subscribers: json_u64(user, "num.subscribers"),
            subscriptions: json_u64(user, "num.subscriptions"),
            avatar_url: json_by_first_path(
                user,
                &[
                    "photo.thumb.large_url",
                    "photo.thumb.medium_url",
                    "photo.thumb.small_url",
                    "photo.url",
                ],
            )
            .and_then(Value::as_str)
            .map(str::to_string),
            cover_url: json_string(user, "cover_url").or_else(|| json_string(user, "coverUrl")),
        })
    }

    fn into_page_info(self) -> PageInfo {
        PageInfo {
            nick: Some(self.nick),
            name: None,
            description: self.about,
            statistics: PageStatistics {
                posts: self.total_posts,
                followers: self.subscribers,
                following: self.subscriptions,
            },
            avatar: self.avatar_url.as_deref().and_then(to_image),
            cover: self.cover_url.as_deref().and_then(to_image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FEED: &str = r#"<html><body><ul>
      <li class="stream__item" data-ratio="1.5"><a href="/picture/abc123?s=cl"><img data-src="https://img.ifunny.co/abc.jpg" alt="when the code compiles"></a></li>
      <li class="stream__item"><span>ad slot</span></li>
      <li class="stream__item" data-ratio="0.5"><a href="/video/vid789"><img data-src="https://img.ifunny.co/vid.jpg"></a></li>
      <li class="stream__item"><a href="/picture/noimg"></a></li>
    </ul></body></html>"#;

    #[test]
    fn first_page_path_marks_feeds_but_not_users() {
        assert_eq!(first_page_path("/featured"), "/featured/page1");
        assert_eq!(first_page_path("/tags/cats/"), "/tags/cats/page1");
        assert_eq!(first_page_path("/user/memes"), "/user/memes");
    }

    #[test]
    fn parse_feed_page_maps_items_and_skips_broken_ones() {
        let page = parse_feed_page(FEED, "/featured/page1");
        assert_eq!(page.fragments.len(), 4);
        assert_eq!(page.next.as_deref(), Some("/featured/page2"));

        let posts: Vec<Post> = page.fragments.into_iter().flatten().collect();
        assert_eq!(posts.len(), 2);

        assert_eq!(posts[0].id, "abc123");
        assert_eq!(posts[0].text.as_deref(), Some("when the code compiles"));
        assert_eq!(
            posts[0].media,
            vec![Media::image("https://img.ifunny.co/abc.jpg", Some(1.0 / 1.5))]
        );

        assert_eq!(posts[1].id, "vid789");
        assert_eq!(
            posts[1].media,
            vec![Media::video("https://ifunny.co/video/vid789", Some(2.0))]
        );
    }

    #[test]
    fn user_page_has_no_next_cursor() {
        let page = parse_feed_page(FEED, "/user/memes");
        assert!(page.next.is_none());
    }

    #[test]
    fn empty_feed_has_no_fragments() {
        let page = parse_feed_page("<html><body><p>nothing</p></body></html>", "/featured/page9");
        assert!(page.fragments.is_empty());
    }

    #[test]
    fn supports_matches_ifunny_hosts_only() {
        let skraper = IFunnySkraper::new(crate::ReqwestClient::new().unwrap().shared());
        assert!(skraper.supports("https://ifunny.co/picture/abc"));
        assert!(skraper.supports("https://img.ifunny.co/images/abc.jpg"));
        assert!(!skraper.supports("https://notifunny.co/picture/abc"));
        assert!(!skraper.supports("https://reddit.com/r/ifunny.co"));
    }

    #[test]
    fn extract_initial_state_finds_blob() {
        let html = r#"<html><head>
            <script>var unrelated = 1;</script>
            <script>window.__INITIAL_STATE__ = {"user":{"data":{"nick":"memes"}}};</script>
            </head></html>"#;
        let state = extract_initial_state(html).unwrap();
        assert_eq!(state["user"]["data"]["nick"], "memes");
    }

    #[test]
    fn extract_initial_state_ignores_trailing_statements() {
        let html = r#"<script>
            window.__INITIAL_STATE__ = {"user":{"data":{"nick":"memes"}}};
            window.__CONFIG__ = {"locale":"en"};
        </script>"#;
        let state = extract_initial_state(html).unwrap();
        assert_eq!(state["user"]["data"]["nick"], "memes");
    }

    #[test]
    fn extract_initial_state_absent_or_broken() {
        assert!(extract_initial_state("<html></html>").is_none());
        let broken = "<script>window.__INITIAL_STATE__ = {not json};</script>";
        assert!(extract_initial_state(broken).is_none());
    }

    #[test]
    fn user_record_maps_to_page_info() {
        let state = json!({
            "user": { "data": {
                "nick": "memes",
                "about": "daily memes",
                "num": { "total_posts": 1200, "subscribers": "35000", "subscriptions": 12 },
                "photo": { "url": "https://img/avatar.jpg", "thumb": { "medium_url": "https://img/avatar_m.jpg" } },
                "cover_url": "https://img/cover.jpg"
            }}
        });
        let info = IFunnyUser::from_state(&state).unwrap().into_page_info();
        assert_eq!(info.nick.as_deref(), Some("memes"));
        assert_eq!(info.description.as_deref(), Some("daily memes"));
        assert_eq!(info.statistics.posts, Some(1200));
        assert_eq!(info.statistics.followers, Some(35_000));
        assert_eq!(info.statistics.following, Some(12));
        assert_eq!(info.avatar, Some(Media::image("https://img/avatar_m.jpg", None)));
        assert_eq!(info.cover, Some(Media::image("https://img/cover.jpg", None)));
    }

    #[test]
    fn user_record_requires_nick() {
        let state = json!({ "user": { "data": { "about": "x" } } });
        assert!(IFunnyUser::from_state(&state).is_none());
    }
}
