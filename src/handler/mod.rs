//! Request handler module
//!
//! Resolves request paths under the served root and answers with file
//! contents or directory listings.

pub mod display;
pub mod listing;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
