//! Formatting helpers for directory listings
//!
//! Pure functions: byte sizes, timestamps, display paths and link targets.

use chrono::{DateTime, Local};
use crate::handler::resolve::split_segments;
use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::Path;
use std::time::SystemTime;

/// Characters left as-is inside one URL path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Human-readable byte count
///
/// # Examples
/// ```
/// use dirserve::handler::display::format_size;
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(2048), "2.00 KB");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn format_size(size: u64) -> String {
    if size < KB {
        format!("{size} B")
    } else if size < MB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else if size < GB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else {
        format!("{:.2} GB", size as f64 / GB as f64)
    }
}

/// `YYYY-MM-DD HH:MM:SS` in server local time
pub fn format_modified(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Show `path` relative to `home` as `~/...` when it lies under it.
///
/// Purely cosmetic; falls back to the absolute path.
pub fn display_path(path: &Path, home: Option<&Path>) -> String {
    match home.and_then(|h| path.strip_prefix(h).ok()) {
        Some(rel) if rel.as_os_str().is_empty() => "~/".to_string(),
        Some(rel) => format!("~/{}", rel.display()),
        None => path.display().to_string(),
    }
}

/// Request path split into clean segments, with `.` dropped and `..` applied
fn request_segments(request_path: &[u8]) -> Vec<&[u8]> {
    let mut segments = Vec::new();
    for segment in split_segments(request_path) {
        match segment {
            b"." => {}
            b".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments
}

fn encode_segments(segments: &[&[u8]]) -> String {
    segments
        .iter()
        .map(|s| format!("/{}", percent_encode(s, SEGMENT)))
        .collect()
}

/// Link to the lexical parent of `request_path`, always ending in `/`
pub fn parent_href(request_path: &[u8]) -> String {
    let segments = request_segments(request_path);
    match segments.split_last() {
        Some((_, parent)) if !parent.is_empty() => format!("{}/", encode_segments(parent)),
        _ => "/".to_string(),
    }
}

/// Link to a child of the directory at `request_path`.
///
/// `name` is the raw file name; bytes that are not valid UTF-8 are percent-encoded
/// as-is so the link leads back to the same file. Directories get a trailing `/`
/// so relative navigation keeps working.
pub fn child_href(request_path: &[u8], name: &[u8], is_dir: bool) -> String {
    let mut segments = request_segments(request_path);
    segments.push(name);
    let mut href = encode_segments(&segments);
    if is_dir {
        href.push('/');
    }
    href
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
