//! HTTP protocol layer module
//!
//! Response bodies, builders and content-type detection, independent of how
//! paths are resolved.

pub mod body;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use response::{
    build_405_response, build_error_response, build_file_response, build_html_response,
    build_options_response,
};
