//! Provider contract and routing.
//!
//! # Architecture
//!
//! - [`Skraper`]: async trait every site adapter implements
//! - [`SkraperRouter`]: dispatches media URLs to the provider that owns them
//! - [`ifunny`], [`reddit`]: bundled adapters
//!
//! A provider supplies three things: a base URL, a page fetch that maps raw
//! fragments to [`Post`](crate::Post)s, and page-info extraction. Pagination,
//! extraction helpers and link-preview resolution come from the rest of the
//! crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use skraper::provider::{ifunny::IFunnySkraper, Skraper};
//! use skraper::ReqwestClient;
//!
//! # async fn example() -> skraper::Result<()> {
//! let skraper = IFunnySkraper::new(ReqwestClient::new()?.shared());
//!
//! let mut posts = skraper.get_posts("/featured");
//! while let Some(post) = posts.try_next().await? {
//!     println!("{} ({} media)", post.id, post.media.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod ifunny;
pub mod reddit;

use async_trait::async_trait;

use crate::client::{fetch_open_graph_media, SharedClient, SkraperClient};
use crate::error::Result;
use crate::model::{Media, PageInfo};
use crate::paginate::PostStream;

/// A site adapter.
#[async_trait]
pub trait Skraper: Send + Sync {
    /// Provider name (e.g., "ifunny", "reddit").
    fn name(&self) -> &'static str;

    /// Canonical base URL paths are resolved against.
    fn base_url(&self) -> &str;

    /// Fetch client this provider talks through.
    fn client(&self) -> &dyn SkraperClient;

    /// Check whether `media_url` belongs to this provider. Pure, no I/O.
    fn supports(&self, media_url: &str) -> bool;

    /// Lazily page through the feed at `path`.
    ///
    /// Each call starts from the first page. The stream ends cleanly when the
    /// feed runs out, or yields one `Err` if a page cannot be fetched.
    fn get_posts(&self, path: &str) -> PostStream<'_>;

    /// Account or channel metadata for `path`; `None` when it does not exist.
    async fn get_page_info(&self, path: &str) -> Result<Option<PageInfo>>;

    /// Fill in canonical URL and aspect ratio of `media`.
    ///
    /// Fully specified media is returned as-is without a fetch. Media whose
    /// page carries no preview metadata is returned unchanged.
    async fn resolve(&self, media: Media) -> Result<Media> {
        if media.is_resolved() {
            return Ok(media);
        }
        fetch_open_graph_media(self.client(), media).await
    }
}

/// Routes media URLs to providers.
///
/// Providers are checked in registration order. First match wins.
pub struct SkraperRouter {
    providers: Vec<Box<dyn Skraper>>,
}

impl SkraperRouter {
    /// Router over all bundled providers sharing one client.
    #[must_use]
    pub fn new(client: SharedClient) -> Self {
        let providers: Vec<Box<dyn Skraper>> = vec![
            Box::new(ifunny::IFunnySkraper::new(client.clone())),
            Box::new(reddit::RedditSkraper::new(client)),
        ];
        Self { providers }
    }

    /// Router over a custom provider list.
    #[must_use]
    pub fn with_providers(providers: Vec<Box<dyn Skraper>>) -> Self {
        Self { providers }
    }

    #[must_use]
    pub fn providers(&self) -> &[Box<dyn Skraper>] {
        &self.providers
    }

    /// First provider that supports `media_url`.
    #[must_use]
    pub fn find(&self, media_url: &str) -> Option<&dyn Skraper> {
        self.providers
            .iter()
            .find(|p| p.supports(media_url))
            .map(|p| p.as_ref())
    }

    /// Resolve `media` with the provider that owns its URL.
    ///
    /// Media no provider claims is returned unchanged.
    pub async fn resolve(&self, media: Media) -> Result<Media> {
        match self.find(media.url()) {
            Some(provider) => {
                tracing::debug!("Resolving {} via {}", media.url(), provider.name());
                provider.resolve(media).await
            }
            None => {
                tracing::debug!("No provider supports {}", media.url());
                Ok(media)
            }
        }
    }
}
