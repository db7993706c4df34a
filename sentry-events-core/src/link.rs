//! Pagination cursor extraction from RFC 5988 `Link` headers
//!
//! Sentry answers list endpoints with a header such as
//! `<url>; rel="previous"; results="false"; cursor="0:0:1", <url>; rel="next"; results="true"; cursor="0:100:0"`.
//! Malformed or missing headers mean "no next page", never an error.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::{CURSOR_PATTERN, REL_NEXT};

fn cursor_regex() -> &'static Regex {
    static CURSOR: OnceLock<Regex> = OnceLock::new();
    CURSOR.get_or_init(|| Regex::new(CURSOR_PATTERN).expect("cursor pattern compiles"))
}

/// First comma separated segment mentioning `rel="next"`
pub fn find_next_link(header: &str) -> Option<&str> {
    header.split(',').find(|segment| segment.contains(REL_NEXT))
}

/// Cursor token of a link segment; empty tokens count as absent
pub fn extract_cursor(segment: &str) -> Option<String> {
    cursor_regex()
        .captures(segment)
        .and_then(|caps| caps.get(1))
        .map(|token| token.as_str())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Cursor of the next page, if the header advertises one
pub fn next_cursor(header: Option<&str>) -> Option<String> {
    header.and_then(find_next_link).and_then(extract_cursor)
}
