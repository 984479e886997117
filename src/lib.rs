//! `skraper` - pluggable scraper for social feeds
//!
//! # Features
//!
//! - **Provider contract**: one [`Skraper`] trait for every site adapter
//! - **Lazy pagination**: feeds are [`PostStream`]s that fetch one page at a
//!   time and stop as soon as the consumer does
//! - **Extraction helpers**: HTML element lookup, dotted JSON paths, tolerant
//!   number parsing
//! - **Normalized model**: [`Post`], [`Media`], [`PageInfo`] shared by all providers
//!
//! # Example
//!
//! ```rust,no_run
//! use futures::{StreamExt, TryStreamExt};
//! use skraper::{ReqwestClient, Skraper, SkraperRouter};
//! use skraper::provider::reddit::RedditSkraper;
//!
//! #[tokio::main]
//! async fn main() -> skraper::Result<()> {
//!     let client = ReqwestClient::new()?.shared();
//!     let reddit = RedditSkraper::new(client.clone());
//!
//!     let posts: Vec<_> = reddit.get_posts("/r/rust").take(10).try_collect().await?;
//!     println!("Fetched {} posts", posts.len());
//!
//!     let router = SkraperRouter::new(client);
//!     for media in posts.into_iter().flat_map(|p| p.media) {
//!         let media = router.resolve(media).await?;
//!         println!("{} {:?}", media.url(), media.aspect_ratio());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod paginate;
pub mod profile;
pub mod provider;

pub use client::{
    fetch_document, fetch_json, fetch_link_preview, fetch_open_graph_media, HttpRequest,
    LinkPreview, PreviewResource, ReqwestClient, SharedClient, SkraperClient,
};
pub use config::ClientConfig;
pub use error::{Result, SkraperError};
pub use model::{Media, PageInfo, PageStatistics, Post, PostStatistics};
pub use paginate::{collect_posts, paginate, Page, PostStream};
pub use provider::{Skraper, SkraperRouter};

/// Version of skraper
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
