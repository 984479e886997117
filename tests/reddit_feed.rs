//! Reddit listing pagination and subreddit metadata over scripted JSON.

mod common;

use std::sync::Arc;

use common::{init_tracing, FixtureClient};
use futures::TryStreamExt;
use serde_json::json;
use skraper::provider::reddit::RedditSkraper;
use skraper::{Media, Post, Skraper, SkraperError};

const FIRST: &str = "https://www.reddit.com/r/rust.json?limit=25&raw_json=1";
const SECOND: &str = "https://www.reddit.com/r/rust.json?limit=25&raw_json=1&after=t3_b";

fn listing(ids: &[&str], after: Option<&str>) -> String {
    let children: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({ "kind": "t3", "data": {
                "id": id,
                "title": format!("post {id}"),
                "created_utc": 1_700_000_000,
                "url": format!("https://i.redd.it/{id}.jpg"),
                "score": 1,
                "num_comments": 0
            }})
        })
        .collect();
    json!({ "kind": "Listing", "data": { "after": after, "children": children } }).to_string()
}

#[tokio::test]
async fn follows_after_tokens_until_exhausted() {
    init_tracing();
    let client = Arc::new(
        FixtureClient::new()
            .with(FIRST, listing(&["a", "b"], Some("t3_b")))
            .with(SECOND, listing(&["c"], None)),
    );
    let skraper = RedditSkraper::new(client.clone());

    let posts: Vec<Post> = skraper.get_posts("rust").try_collect().await.unwrap();

    let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert_eq!(client.requests(), [FIRST, SECOND]);
    assert_eq!(posts[2].media, vec![Media::image("https://i.redd.it/c.jpg", None)]);
    assert_eq!(posts[2].text.as_deref(), Some("post c"));
}

#[tokio::test]
async fn empty_listing_ends_after_one_fetch() {
    let client = Arc::new(FixtureClient::new().with(FIRST, listing(&[], Some("t3_zzz"))));
    let skraper = RedditSkraper::new(client.clone());

    let posts: Vec<Post> = skraper.get_posts("/r/rust/").try_collect().await.unwrap();

    assert!(posts.is_empty());
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn invalid_json_is_a_failure() {
    let client = Arc::new(FixtureClient::new().with(FIRST, "<html>rate limited</html>"));
    let skraper = RedditSkraper::new(client);

    let err = skraper
        .get_posts("/r/rust")
        .try_collect::<Vec<Post>>()
        .await
        .unwrap_err();

    assert!(matches!(err, SkraperError::Json { .. }));
}

#[tokio::test]
async fn page_info_for_subreddit() {
    let about = json!({ "kind": "t5", "data": {
        "display_name": "rust",
        "title": "Rust",
        "public_description": "All things Rust",
        "subscribers": 300_000,
        "icon_img": "https://b.thumbs.redditmedia.com/icon.png"
    }});
    let client = Arc::new(
        FixtureClient::new().with("https://www.reddit.com/r/rust/about.json", about.to_string()),
    );
    let skraper = RedditSkraper::new(client);

    let info = skraper.get_page_info("rust").await.unwrap().unwrap();

    assert_eq!(info.nick.as_deref(), Some("rust"));
    assert_eq!(info.description.as_deref(), Some("All things Rust"));
    assert_eq!(info.statistics.followers, Some(300_000));
    assert_eq!(info.statistics.following, None);
    assert_eq!(
        info.avatar,
        Some(Media::image("https://b.thumbs.redditmedia.com/icon.png", None))
    );
}

#[tokio::test]
async fn page_info_absent_for_missing_subreddit() {
    let skraper = RedditSkraper::new(Arc::new(FixtureClient::new()));
    assert!(skraper.get_page_info("/r/doesnotexist").await.unwrap().is_none());
}

#[test]
fn supports_reddit_media_hosts() {
    let client = Arc::new(FixtureClient::new());
    let skraper = RedditSkraper::new(client.clone());

    assert!(skraper.supports("https://i.redd.it/abc.jpg"));
    assert!(skraper.supports("https://v.redd.it/abc"));
    assert!(skraper.supports("https://old.reddit.com/r/rust"));
    assert!(!skraper.supports("https://ifunny.co/picture/abc"));
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn page_info_for_user() {
    let about = json!({ "kind": "t2", "data": {
        "name": "spez",
        "icon_img": "https://styles.redditmedia.com/spez.png",
        "subreddit": { "display_name_prefixed": "u/spez", "subscribers": 42 }
    }});
    let client = Arc::new(
        FixtureClient::new().with("https://www.reddit.com/user/spez/about.json", about.to_string()),
    );
    let skraper = RedditSkraper::new(client.clone());

    let info = skraper.get_page_info("/user/spez").await.unwrap().unwrap();

    assert_eq!(info.nick.as_deref(), Some("u/spez"));
    assert_eq!(info.statistics.followers, Some(42));
    assert_eq!(client.request_count(), 1);
}
