//! Tolerant text coercion. Every parser returns `None` instead of failing.

use crate::model::Media;

fn strip_separators(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' ' | '\u{a0}'))
        .collect()
}

/// Parse an integer, ignoring surrounding whitespace and thousands separators.
#[must_use]
pub fn parse_int(s: &str) -> Option<i64> {
    strip_separators(s).parse().ok()
}

/// Parse a finite decimal, ignoring whitespace and thousands separators.
#[must_use]
pub fn parse_decimal(s: &str) -> Option<f64> {
    strip_separators(s)
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
}

/// Parse a compact count such as `"1.5K"`, `"3M"` or `"12 345"`.
#[must_use]
pub fn parse_count(s: &str) -> Option<u64> {
    let cleaned = strip_separators(s);
    let (number, multiplier) = match cleaned.chars().last()? {
        'k' | 'K' => (&cleaned[..cleaned.len() - 1], 1_000.0),
        'm' | 'M' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        'b' | 'B' => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };
    let value = number.parse::<f64>().ok()? * multiplier;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = value.round() as u64;
    Some(count)
}

/// Treat a bare URL as an image when nothing says otherwise.
#[must_use]
pub fn to_image(url: &str) -> Option<Media> {
    let url = url.trim();
    (!url.is_empty()).then(|| Media::image(url, None))
}

/// Inverse of a height / width ratio, as found in `data-ratio` attributes.
#[must_use]
pub fn inverse_ratio(s: &str) -> Option<f64> {
    parse_decimal(s).filter(|r| *r > 0.0).map(|r| 1.0 / r)
}
