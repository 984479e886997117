//! Fetch client boundary.
//!
//! [`SkraperClient`] is the only I/O seam in the crate: providers and the
//! pagination engine talk to it, tests swap in scripted fixtures. The free
//! functions layer document, JSON and link-preview fetching on top of the
//! raw text request.
//!
//! [`ReqwestClient`] is the production implementation:
//! - Brotli, Zstd, Gzip compression (auto-negotiated)
//! - TLS via rustls
//! - Connection pooling with keep-alive
//! - Browser-like default headers

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::{Method, StatusCode};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Client;
use scraper::Html;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Result, SkraperError};
use crate::extract::{meta_content, parse_decimal, parse_document};
use crate::model::Media;
use crate::profile::random_profile;

/// A single outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Transport used by every provider. Must be safe to share between
/// concurrently running feeds.
#[async_trait]
pub trait SkraperClient: Send + Sync {
    /// Perform the request and return the body text.
    ///
    /// `Ok(None)` means the resource does not exist (404 / 410). Network
    /// failures and other non-2xx statuses are errors.
    async fn request(&self, request: &HttpRequest) -> Result<Option<String>>;
}

pub type SharedClient = Arc<dyn SkraperClient>;

/// Fetch and parse a markup document.
pub async fn fetch_document(
    client: &dyn SkraperClient,
    request: &HttpRequest,
) -> Result<Option<Html>> {
    let body = client.request(request).await?;
    Ok(body.map(|html| parse_document(&html)))
}

/// Fetch and decode a JSON tree.
pub async fn fetch_json(client: &dyn SkraperClient, request: &HttpRequest) -> Result<Option<Value>> {
    let Some(body) = client.request(request).await? else {
        return Ok(None);
    };
    serde_json::from_str(&body)
        .map(Some)
        .map_err(|source| SkraperError::Json {
            url: request.url.clone(),
            source,
        })
}

/// One Open Graph resource (`og:image`, `og:video`).
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewResource {
    pub url: String,
    /// Width / height, when both dimensions are declared.
    pub aspect_ratio: Option<f64>,
}

/// Link-preview metadata read from a page's `<meta>` tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPreview {
    pub canonical_url: Option<String>,
    pub image: Option<PreviewResource>,
    pub video: Option<PreviewResource>,
    pub audio: Option<String>,
}

impl LinkPreview {
    /// Read Open Graph tags (with Twitter card fallbacks). `None` when the
    /// page declares none of them.
    #[must_use]
    pub fn from_document(document: &Html) -> Option<Self> {
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| meta_content(document, key))
                .map(str::to_string)
        };
        let ratio = |prefix: &str| {
            let width = meta_content(document, &format!("{prefix}:width")).and_then(parse_decimal)?;
            let height =
                meta_content(document, &format!("{prefix}:height")).and_then(parse_decimal)?;
            (width > 0.0 && height > 0.0).then(|| width / height)
        };

        let preview = Self {
            canonical_url: first(&["og:url"]),
            image: first(&["og:image", "og:image:url", "og:image:secure_url", "twitter:image"])
                .map(|url| PreviewResource {
                    url,
                    aspect_ratio: ratio("og:image"),
                }),
            video: first(&["og:video", "og:video:url", "og:video:secure_url", "twitter:player:stream"])
                .map(|url| PreviewResource {
                    url,
                    aspect_ratio: ratio("og:video"),
                }),
            audio: first(&["og:audio", "og:audio:url", "og:audio:secure_url"]),
        };

        (preview != Self::default()).then_some(preview)
    }

    /// Fill `media` from this preview. Without a resource of the media's own
    /// kind the canonical URL (`og:url`) is used. Fields the preview lacks
    /// keep their current value.
    #[must_use]
    pub fn apply(&self, media: Media) -> Media {
        match media {
            Media::Image { .. } => match &self.image {
                Some(image) => {
                    let ratio = image.aspect_ratio.or(media.aspect_ratio());
                    media.with_url(image.url.clone()).with_aspect_ratio(ratio)
                }
                None => self.with_canonical_url(media),
            },
            Media::Video { .. } => {
                let ratio = self
                    .video
                    .as_ref()
                    .and_then(|v| v.aspect_ratio)
                    .or_else(|| self.image.as_ref().and_then(|i| i.aspect_ratio))
                    .or(media.aspect_ratio());
                let media = match &self.video {
                    Some(video) => media.with_url(video.url.clone()),
                    None => self.with_canonical_url(media),
                };
                media.with_aspect_ratio(ratio)
            }
            Media::Audio { .. } => match &self.audio {
                Some(url) => media.with_url(url.clone()),
                None => self.with_canonical_url(media),
            },
        }
    }

    fn with_canonical_url(&self, media: Media) -> Media {
        match &self.canonical_url {
            Some(url) => media.with_url(url.clone()),
            None => media,
        }
    }
}

/// Fetch a page and read its link-preview metadata.
///
/// `Ok(None)` when the page does not exist or declares no preview tags.
#[instrument(skip(client))]
pub async fn fetch_link_preview(
    client: &dyn SkraperClient,
    url: &str,
) -> Result<Option<LinkPreview>> {
    let Some(body) = client.request(&HttpRequest::get(url)).await? else {
        debug!("Link preview target not found");
        return Ok(None);
    };
    let document = parse_document(&body);
    Ok(LinkPreview::from_document(&document))
}

/// Resolve `media` through the link preview of its own URL.
///
/// Media without a URL, or whose page has no preview metadata, is
/// returned unchanged.
pub async fn fetch_open_graph_media(client: &dyn SkraperClient, media: Media) -> Result<Media> {
    if media.url().trim().is_empty() {
        return Ok(media);
    }
    let preview = fetch_link_preview(client, media.url()).await?;
    Ok(match preview {
        Some(preview) => preview.apply(media),
        None => media,
    })
}

/// Production client backed by `reqwest`.
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Client with default configuration and a random browser profile.
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let mut headers = match &config.user_agent {
            Some(ua) => {
                let mut headers = HeaderMap::new();
                headers.insert(USER_AGENT, header_value(ua)?);
                headers
            }
            None => random_profile().to_headers(),
        };
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| SkraperError::InvalidRequest(format!("header name {name:?}: {e}")))?;
            headers.insert(name, header_value(value)?);
        }

        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .cookie_store(config.cookies)
            .build()
            .map_err(|e| SkraperError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wrap as a shareable client handle.
    #[must_use]
    pub fn shared(self) -> SharedClient {
        Arc::new(self)
    }

    /// Get the underlying reqwest client
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| SkraperError::InvalidRequest(format!("header value {value:?}: {e}")))
}

#[async_trait]
impl SkraperClient for ReqwestClient {
    #[instrument(skip(self, request), fields(url = %request.url, method = %request.method))]
    async fn request(&self, request: &HttpRequest) -> Result<Option<String>> {
        debug!("Fetching");
        let transport = |source| SkraperError::Transport {
            url: request.url.clone(),
            source,
        };

        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        info!(
            status = %status,
            version = ?response.version(),
            "Response received"
        );

        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SkraperError::Status {
                url: request.url.clone(),
                status,
            });
        }

        let text = response.text().await.map_err(transport)?;
        Ok(Some(text))
    }
}
