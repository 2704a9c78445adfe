//! MIME type detection module
//!
//! Guesses the Content-Type of a served file from its extension.

use mime_guess::mime;
use std::path::Path;

/// Get MIME Content-Type for a file path
///
/// Text types carry an explicit UTF-8 charset; unknown extensions fall back to
/// `application/octet-stream`.
///
/// # Examples
/// ```
/// use dirserve::http::mime::content_type_for;
/// use std::path::Path;
/// assert_eq!(content_type_for(Path::new("index.html")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(Path::new("clip.mp4")), "video/mp4");
/// assert_eq!(content_type_for(Path::new("blob")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> String {
    let guess = mime_guess::from_path(path).first_or_octet_stream();
    let needs_charset = guess.get_param(mime::CHARSET).is_none()
        && (guess.type_() == mime::TEXT
            || guess.subtype() == mime::JAVASCRIPT
            || guess.subtype() == mime::JSON);

    if needs_charset {
        format!("{}; charset=utf-8", guess.essence_str())
    } else {
        guess.essence_str().to_string()
    }
}
