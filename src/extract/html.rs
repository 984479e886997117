//! Markup tree navigation.
//!
//! Thin helpers over `scraper` element trees. Lookups walk descendants in
//! document order and never fail: a missing element is `None` or an empty vec.

use scraper::{ElementRef, Html};

/// Parse a full HTML document.
#[must_use]
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Descendant elements of `node` in document order, excluding `node` itself.
fn descendant_elements<'a>(node: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    node.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// First descendant with the given tag name (case-insensitive).
#[must_use]
pub fn first_element_by_tag<'a>(node: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    descendant_elements(node).find(|el| el.value().name().eq_ignore_ascii_case(tag))
}

/// All descendants with the given tag name.
#[must_use]
pub fn elements_by_tag<'a>(node: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    descendant_elements(node)
        .filter(|el| el.value().name().eq_ignore_ascii_case(tag))
        .collect()
}

/// All descendants carrying `class_name` among their classes.
#[must_use]
pub fn elements_by_class<'a>(node: ElementRef<'a>, class_name: &str) -> Vec<ElementRef<'a>> {
    descendant_elements(node)
        .filter(|el| el.value().classes().any(|c| c == class_name))
        .collect()
}

/// Attribute value, with blank values treated as absent.
#[must_use]
pub fn attr<'a>(node: ElementRef<'a>, name: &str) -> Option<&'a str> {
    node.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Concatenated, trimmed text content; `None` when blank.
#[must_use]
pub fn text(node: ElementRef<'_>) -> Option<String> {
    let text = node.text().collect::<String>();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `content` of the first `<meta>` whose `property` or `name` equals `key`.
///
/// Covers both Open Graph (`property="og:image"`) and Twitter card
/// (`name="twitter:image"`) conventions.
#[must_use]
pub fn meta_content<'a>(document: &'a Html, key: &str) -> Option<&'a str> {
    elements_by_tag(document.root_element(), "meta")
        .into_iter()
        .find(|meta| {
            let v = meta.value();
            v.attr("property") == Some(key) || v.attr("name") == Some(key)
        })
        .and_then(|meta| attr(meta, "content"))
}
