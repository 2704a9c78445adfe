//! HTTP response building module
//!
//! Builders for every response the handler sends.

use super::body::{self, ResponseBody};
use crate::error::ServeError;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, SERVER};
use hyper::{Response, StatusCode};

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Plain-text response for a failed request
pub fn build_error_response(err: &ServeError, server_name: &str) -> Response<ResponseBody> {
    build_text_response(err.status(), err.public_message(), server_name)
}

fn build_text_response(status: StatusCode, text: &'static str, server_name: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(SERVER, server_name)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .header(CONTENT_LENGTH, text.len())
        .body(body::full(text))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status, text)
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(server_name: &str) -> Response<ResponseBody> {
    let text = "405 Method Not Allowed";
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(SERVER, server_name)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(ALLOW, ALLOWED_METHODS)
        .body(body::full(text))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            fallback(StatusCode::METHOD_NOT_ALLOWED, text)
        })
}

/// Build OPTIONS response
pub fn build_options_response(server_name: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(SERVER, server_name)
        .header(ALLOW, ALLOWED_METHODS)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(body::empty())
        })
}

/// Build directory listing response
pub fn build_html_response(content: String, server_name: &str, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(SERVER, server_name)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(body::empty())
        })
}

/// Build file response around an already prepared body
pub fn build_file_response(
    body: ResponseBody,
    content_type: &str,
    content_length: u64,
    server_name: &str,
) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header(SERVER, server_name)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            fallback(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        })
}

fn fallback(status: StatusCode, text: &'static str) -> Response<ResponseBody> {
    let mut response = Response::new(body::full(Bytes::from_static(text.as_bytes())));
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
