//! URL helpers used by providers to match hosts and build request URLs.

use url::Url;

/// Lowercased host of `url`. Scheme-less input (`"ifunny.co/user/x"`) is
/// parsed as https.
#[must_use]
pub fn host(url: &str) -> Option<String> {
    let url = url.trim();
    let parsed = Url::parse(url).or_else(|_| Url::parse(&format!("https://{url}")));
    parsed
        .ok()?
        .host_str()
        .map(str::to_lowercase)
        .filter(|h| !h.is_empty())
}

/// `true` when `url`'s host is `domain` or a subdomain of it.
#[must_use]
pub fn host_matches(url: &str, domain: &str) -> bool {
    host(url).is_some_and(|h| h == domain || h.ends_with(&format!(".{domain}")))
}

/// Join a provider base URL and a path. Absolute `path`s pass through.
#[must_use]
pub fn build_full_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Last non-empty path segment of a link, without query or fragment.
#[must_use]
pub fn last_path_segment(link: &str) -> Option<&str> {
    let link = link.split(['?', '#']).next().unwrap_or(link);
    link.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}
