//! Extraction utilities composed by providers.
//!
//! Everything here is pure and operates on an already-fetched tree:
//!
//! - [`html`]: element lookup by tag, class, attribute and `<meta>` key
//! - [`json`]: dotted-path navigation with first-match fallback
//! - [`text`]: tolerant numeric coercion and string → [`Media`](crate::Media)
//! - [`link`]: host matching and URL joining
//!
//! "Not found" is always `None` or an empty vec, never an error.

pub mod html;
pub mod json;
pub mod link;
pub mod text;

pub use html::{
    attr, elements_by_class, elements_by_tag, first_element_by_tag, meta_content, parse_document,
    text,
};
pub use json::{json_by_first_path, json_by_path, json_f64, json_string, json_u64};
pub use link::{build_full_url, host, host_matches, last_path_segment};
pub use text::{inverse_ratio, parse_count, parse_decimal, parse_int, to_image};
