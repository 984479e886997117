//! Browser header profiles.
//!
//! Several feeds serve stripped-down or blocked pages to obvious bot user
//! agents, so the default client presents as a mainstream desktop browser.

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

const CHROME_VERSIONS: &[&str] = &["131.0.6778.108", "132.0.6834.83", "133.0.6943.98"];
const FIREFOX_VERSIONS: &[&str] = &["133.0", "134.0", "135.0"];

/// Headers identifying the client as a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

#[derive(Debug, Clone, Copy)]
enum Platform {
    MacOS,
    Windows,
    Linux,
}

impl Platform {
    fn random() -> Self {
        let roll: f32 = rand::thread_rng().gen();
        if roll < 0.65 {
            Platform::Windows
        } else if roll < 0.85 {
            Platform::MacOS
        } else {
            Platform::Linux
        }
    }

    fn os_string(self) -> &'static str {
        match self {
            Platform::MacOS => "Macintosh; Intel Mac OS X 10_15_7",
            Platform::Windows => "Windows NT 10.0; Win64; x64",
            Platform::Linux => "X11; Linux x86_64",
        }
    }
}

fn pick(options: &[&'static str]) -> &'static str {
    options
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}

/// A Chrome desktop profile.
#[must_use]
pub fn chrome_profile() -> BrowserProfile {
    BrowserProfile {
        user_agent: format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            Platform::random().os_string(),
            pick(CHROME_VERSIONS)
        ),
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
            .to_string(),
        accept_language: "en-US,en;q=0.9".to_string(),
    }
}

/// A Firefox desktop profile.
#[must_use]
pub fn firefox_profile() -> BrowserProfile {
    let version = pick(FIREFOX_VERSIONS);
    BrowserProfile {
        user_agent: format!(
            "Mozilla/5.0 ({}; rv:{version}) Gecko/20100101 Firefox/{version}",
            Platform::random().os_string()
        ),
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        accept_language: "en-US,en;q=0.5".to_string(),
    }
}

/// Chrome or Firefox, weighted roughly by market share.
#[must_use]
pub fn random_profile() -> BrowserProfile {
    let roll: f32 = rand::thread_rng().gen();
    if roll < 0.8 {
        chrome_profile()
    } else {
        firefox_profile()
    }
}

impl BrowserProfile {
    /// Convert to default request headers. Values that are not valid header
    /// text are left out.
    #[must_use]
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            (USER_AGENT, &self.user_agent),
            (ACCEPT, &self.accept),
            (ACCEPT_LANGUAGE, &self.accept_language),
        ] {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }
        headers
    }
}
