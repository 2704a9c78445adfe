//! Static content module
//!
//! Given a resolved target, stats it and answers with either the file's bytes
//! or a generated directory listing.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::display::display_path;
use crate::handler::listing::Listing;
use crate::handler::resolve::ResolvedRequest;
use crate::http::{self, body, mime, ResponseBody};
use hyper::Response;
use std::path::Path;

/// Answer a resolved request.
///
/// Regular files are streamed unmodified; directories get an HTML listing.
/// Anything else (sockets, FIFOs, devices) is treated as not found.
pub async fn serve(
    resolved: &ResolvedRequest,
    state: &AppState,
    is_head: bool,
) -> Result<Response<ResponseBody>, ServeError> {
    let target = resolved.absolute_target.as_path();
    let metadata = tokio::fs::metadata(target)
        .await
        .map_err(|e| ServeError::from_io(target, e))?;

    if metadata.is_file() {
        serve_file(target, metadata.len(), state, is_head).await
    } else if metadata.is_dir() {
        serve_listing(resolved, state, is_head).await
    } else {
        Err(ServeError::NotFound(target.to_path_buf()))
    }
}

async fn serve_file(
    path: &Path,
    len: u64,
    state: &AppState,
    is_head: bool,
) -> Result<Response<ResponseBody>, ServeError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ServeError::from_io(path, e))?;

    let body = if is_head {
        body::empty()
    } else {
        body::stream(file)
    };

    Ok(http::build_file_response(
        body,
        &mime::content_type_for(path),
        len,
        &state.config.http.server_name,
    ))
}

async fn serve_listing(
    resolved: &ResolvedRequest,
    state: &AppState,
    is_head: bool,
) -> Result<Response<ResponseBody>, ServeError> {
    let dir = resolved.absolute_target.as_path();
    let listing = Listing::build(
        dir,
        &resolved.requested_path,
        resolved.is_root(),
        display_path(dir, state.home_dir()),
    )
    .await?;

    Ok(http::build_html_response(
        listing.render(),
        &state.config.http.server_name,
        is_head,
    ))
}
