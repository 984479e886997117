//! Shared fixtures for integration tests.
//!
//! [`FixtureClient`] answers requests from a URL → response table and keeps
//! a log of every URL requested, so tests can assert exactly which pages
//! were fetched.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use skraper::{HttpRequest, Result, SkraperClient, SkraperError};

enum Fixture {
    Body(String),
    Fail(StatusCode),
}

/// Scripted client. Unknown URLs answer as 404 (`Ok(None)`).
#[derive(Default)]
pub struct FixtureClient {
    responses: HashMap<String, Fixture>,
    log: Mutex<Vec<String>>,
}

impl FixtureClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl Into<String>) -> Self {
        self.responses
            .insert(url.to_string(), Fixture::Body(body.into()));
        self
    }

    pub fn failing(mut self, url: &str, status: StatusCode) -> Self {
        self.responses.insert(url.to_string(), Fixture::Fail(status));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }
}

#[async_trait]
impl SkraperClient for FixtureClient {
    async fn request(&self, request: &HttpRequest) -> Result<Option<String>> {
        self.log.lock().unwrap().push(request.url.clone());
        match self.responses.get(&request.url) {
            Some(Fixture::Body(body)) => Ok(Some(body.clone())),
            Some(Fixture::Fail(status)) => Err(SkraperError::Status {
                url: request.url.clone(),
                status: *status,
            }),
            None => Ok(None),
        }
    }
}

/// Install a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An IFunny feed page with one `.stream__item` per entry. `None` entries
/// render as items without a link (unmappable).
pub fn ifunny_feed(items: &[Option<&str>]) -> String {
    let mut html = String::from("<html><body><ul class=\"feed\">");
    for item in items {
        match item {
            Some(id) => html.push_str(&format!(
                "<li class=\"stream__item\" data-ratio=\"1\"><a href=\"/picture/{id}\">\
                 <img data-src=\"https://img.ifunny.co/{id}.jpg\" alt=\"{id}\"></a></li>"
            )),
            None => html.push_str("<li class=\"stream__item\"><div>sponsored</div></li>"),
        }
    }
    html.push_str("</ul></body></html>");
    html
}
