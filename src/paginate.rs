//! Lazy pagination engine.
//!
//! [`paginate`] turns a "fetch one page for this cursor" function into a
//! single stream of posts:
//!
//! ```text
//! cursor ──fetch──▶ Page { fragments, next }
//!                     │ empty / absent ──▶ end of stream
//!                     ▼
//!              yield Some(post)s in order, skip None
//!                     │ next == None ──▶ end after batch
//!                     ▼
//!                 next cursor ──fetch──▶ …
//! ```
//!
//! The next page is requested only once the consumer has drained the current
//! batch. Dropping the stream drops any in-flight fetch and nothing further is
//! requested. A fetch error is yielded once, after which the stream ends.

use std::fmt::Debug;
use std::future::Future;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::debug;

use crate::error::Result;
use crate::model::Post;

/// Lazy, single-pass sequence of posts.
pub type PostStream<'a> = BoxStream<'a, Result<Post>>;

/// One fetched page after fragment mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<C> {
    /// One entry per raw fragment, in document order. `None` marks a
    /// fragment that could not be mapped (no id, no URL, …).
    pub fragments: Vec<Option<Post>>,
    /// Cursor for the following page; `None` ends the feed after this page.
    pub next: Option<C>,
}

impl<C> Page<C> {
    pub fn new(fragments: Vec<Option<Post>>, next: Option<C>) -> Self {
        Self { fragments, next }
    }
}

/// Drive `fetch_page` from `initial` until a page comes back absent or empty,
/// or no next cursor is known.
pub fn paginate<'a, C, F, Fut>(initial: C, fetch_page: F) -> PostStream<'a>
where
    C: Debug + Send + 'a,
    F: FnMut(C) -> Fut + Send + 'a,
    Fut: Future<Output = Result<Option<Page<C>>>> + Send + 'a,
{
    let pages = stream::try_unfold((Some(initial), fetch_page), |(cursor, fetch_page)| {
        next_batch(cursor, fetch_page)
    });

    pages
        .map_ok(|posts| stream::iter(posts.into_iter().map(Ok)))
        .try_flatten()
        .boxed()
}

/// Fetch and flatten one page. `Ok(None)` is the end-of-feed signal.
async fn next_batch<C, F, Fut>(
    cursor: Option<C>,
    mut fetch_page: F,
) -> Result<Option<(Vec<Post>, (Option<C>, F))>>
where
    C: Debug,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<Option<Page<C>>>>,
{
    let Some(cursor) = cursor else {
        debug!("No next cursor, feed finished");
        return Ok(None);
    };
    debug!(cursor = ?cursor, "Fetching page");
    let Some(page) = fetch_page(cursor).await? else {
        debug!("Page absent, feed finished");
        return Ok(None);
    };
    if page.fragments.is_empty() {
        debug!("Page empty, feed finished");
        return Ok(None);
    }

    let total = page.fragments.len();
    let posts: Vec<Post> = page.fragments.into_iter().flatten().collect();
    debug!(
        fragments = total,
        skipped = total - posts.len(),
        "Page extracted"
    );
    Ok(Some((posts, (page.next, fetch_page))))
}

/// Append a page-one counter: `"/featured"` → `"/featured/page1"`.
#[must_use]
pub fn paged_path(path: &str, marker: &str) -> String {
    format!("{}{marker}1", path.trim_end_matches('/'))
}

/// Increment the trailing page counter: `"/featured/page3"` → `"/featured/page4"`.
///
/// `None` when `path` carries no parsable counter after `marker`.
#[must_use]
pub fn next_page_path(path: &str, marker: &str) -> Option<String> {
    let (prefix, counter) = path.rsplit_once(marker)?;
    let next = counter.parse::<u32>().ok()?.checked_add(1)?;
    Some(format!("{prefix}{marker}{next}"))
}

/// Collect at most `limit` posts. Stops fetching once `limit` is reached.
pub async fn collect_posts(posts: PostStream<'_>, limit: usize) -> Result<Vec<Post>> {
    posts.take(limit).try_collect().await
}
