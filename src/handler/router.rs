//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! resolution, content dispatch and access logging.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::{resolve, static_files};
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::header::{CONTENT_LENGTH, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Every path goes through the same route. The request body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let server_name = state.config.http.server_name.as_str();

    logger::log_request(&method, &path);

    let response = match method {
        Method::GET | Method::HEAD => {
            let is_head = method == Method::HEAD;
            match resolve_and_serve(&path, &state, is_head).await {
                Ok(resp) => resp,
                Err(err) => {
                    log_serve_error(&path, &err);
                    http::build_error_response(&err, server_name)
                }
            }
        }
        Method::OPTIONS => http::build_options_response(server_name),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response(server_name)
        }
    };

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(peer_addr.to_string(), method.to_string(), path);
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        entry.user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve the raw URI path under the root, then serve what it names
async fn resolve_and_serve(
    raw_path: &str,
    state: &AppState,
    is_head: bool,
) -> Result<Response<ResponseBody>, ServeError> {
    let decoded = resolve::decode_request_path(raw_path)?;
    let resolved = resolve::resolve(state.root(), &decoded).await?;
    logger::log_debug(&format!(
        "Resolved {raw_path} -> {}",
        resolved.absolute_target.display()
    ));
    static_files::serve(&resolved, state, is_head).await
}

fn log_serve_error(path: &str, err: &ServeError) {
    match err {
        ServeError::MalformedPath(_) | ServeError::PathEscape(_) => {
            logger::log_rejected(path, &err.to_string());
        }
        ServeError::NotFound(_) => logger::log_debug(&err.to_string()),
        ServeError::Io { .. } => logger::log_error(&err.to_string()),
    }
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};
    use http_body_util::BodyExt;
    use hyper::body::Bytes;
    use hyper::header::CONTENT_TYPE;
    use hyper::StatusCode;
    use std::path::PathBuf;

    struct Fixture {
        _dir: tempfile::TempDir,
        root: PathBuf,
        state: Arc<AppState>,
    }

    fn test_config(root: &std::path::Path) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                root: root.display().to_string(),
                workers: None,
                open_browser: false,
            },
            logging: LoggingConfig {
                level: "error".to_string(),
                access_log: false,
                access_log_format: "common".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive: true,
                read_timeout: 30,
            },
            http: HttpConfig {
                server_name: "dirserve-test".to_string(),
            },
        }
    }

    /// Root with `notes.txt` (120 bytes) and an `img/` subdirectory
    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join("notes.txt"), vec![b'n'; 120]).unwrap();
        std::fs::create_dir(root.join("img")).unwrap();

        let state = AppState::new(test_config(&root), root.clone()).with_home_dir(None);
        Fixture {
            _dir: dir,
            root,
            state: Arc::new(state),
        }
    }

    async fn send(fixture: &Fixture, method: Method, uri: &str) -> (StatusCode, Response<ResponseBody>) {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let resp = handle_request(req, Arc::clone(&fixture.state), peer)
            .await
            .unwrap();
        (resp.status(), resp)
    }

    async fn get(fixture: &Fixture, uri: &str) -> (StatusCode, Bytes) {
        let (status, resp) = send(fixture, Method::GET, uri).await;
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    fn row_count(html: &str) -> usize {
        html.matches("<tr class=\"").count()
    }

    #[tokio::test]
    async fn test_root_listing() {
        let f = fixture();
        let (status, resp) = send(&f, Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(row_count(&html), 2);
        assert!(!html.contains(">..</a>"));
        assert!(html.contains(r#">notes.txt</a></td><td>120 B</td>"#));
        assert!(html.contains(r#">img/</a></td><td>-</td>"#));
        assert!(html.contains(&format!("Directory: {}", f.root.display())));
    }

    #[tokio::test]
    async fn test_file_is_byte_identical() {
        let f = fixture();
        let (status, resp) = send(&f, Method::GET, "/notes.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "120");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.len(), 120);
        assert_eq!(body.as_ref(), std::fs::read(f.root.join("notes.txt")).unwrap());
    }

    #[tokio::test]
    async fn test_large_binary_file_streams_whole() {
        let f = fixture();
        let data: Vec<u8> = (0..300_000u32).map(|i| (i % 253) as u8).collect();
        std::fs::write(f.root.join("img").join("blob.bin"), &data).unwrap();

        let (status, body) = get(&f, "/img/blob.bin").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_ref(), data.as_slice());
    }

    #[tokio::test]
    async fn test_traversal_is_forbidden() {
        let f = fixture();
        for uri in [
            "/../../etc/passwd",
            "/img/../../etc/passwd",
            "/%2e%2e/%2e%2e/etc/passwd",
            "/%2E%2E%2F%2E%2E%2Fetc%2Fpasswd",
            "/img/..%5c..%5c..%5cetc%5cpasswd",
        ] {
            let (status, body) = get(&f, uri).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
            assert_eq!(body, "Access denied: Path outside directory");
        }
    }

    #[tokio::test]
    async fn test_malformed_path_is_bad_request() {
        let f = fixture();
        for uri in ["/notes%00.txt", "/%00"] {
            let (status, _) = get(&f, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_path_is_looked_up() {
        let f = fixture();
        let (status, _) = get(&f, "/%ff%fe").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_name_round_trips_through_listing() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let f = fixture();
        std::fs::write(f.root.join(OsStr::from_bytes(b"caf\xe9.txt")), b"latin-1").unwrap();

        let (_, body) = get(&f, "/").await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(row_count(&html), 3);
        assert!(html.contains("<a href=\"/caf%E9.txt\">caf\u{FFFD}.txt</a>"));

        let (status, body) = get(&f, "/caf%E9.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "latin-1");
    }

    #[tokio::test]
    async fn test_missing_is_not_found() {
        let f = fixture();
        for uri in ["/missing.txt", "/img/missing/deeper", "/notes.txt/inside"] {
            let (status, body) = get(&f, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, "Not found");
        }
    }

    #[tokio::test]
    async fn test_subdirectory_listing_links_to_parent() {
        let f = fixture();
        std::fs::create_dir(f.root.join("img").join("icons")).unwrap();
        std::fs::write(f.root.join("img").join("icons").join("x.svg"), b"<svg/>").unwrap();

        let (status, body) = get(&f, "/img/icons/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(row_count(&html), 2);
        assert!(html.contains(r#"<tr class="parent"><td><a href="/img/">..</a>"#));
        assert!(html.contains(r#"<a href="/img/icons/x.svg">x.svg</a>"#));

        // Without the trailing slash the parent is the same
        let (_, body) = get(&f, "/img/icons").await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(r#"<a href="/img/">..</a>"#));
    }

    #[tokio::test]
    async fn test_empty_subdirectory_has_only_parent_row() {
        let f = fixture();
        let (status, body) = get(&f, "/img/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(row_count(&html), 1);
        assert!(html.contains(r#"<a href="/">..</a>"#));
    }

    #[tokio::test]
    async fn test_repeated_get_is_identical() {
        let f = fixture();
        for uri in ["/", "/notes.txt", "/img/", "/missing.txt", "/../x"] {
            let first = get(&f, uri).await;
            let second = get(&f, uri).await;
            assert_eq!(first, second, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_head_has_headers_but_no_body() {
        let f = fixture();
        let (status, resp) = send(&f, Method::HEAD, "/notes.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "120");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_other_methods() {
        let f = fixture();
        let (status, _) = send(&f, Method::POST, "/notes.txt").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, resp) = send(&f, Method::OPTIONS, "/").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()[hyper::header::ALLOW], "GET, HEAD, OPTIONS");
    }

    #[tokio::test]
    async fn test_listing_uses_home_relative_header() {
        let f = fixture();
        let home = f.root.parent().unwrap().to_path_buf();
        let name = f.root.file_name().unwrap().to_string_lossy().to_string();
        let state = AppState::new(test_config(&f.root), f.root.clone()).with_home_dir(Some(home));
        let f = Fixture {
            state: Arc::new(state),
            ..f
        };

        let (_, body) = get(&f, "/img/").await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(&format!("Directory: ~/{name}/img")));
    }

    #[tokio::test]
    async fn test_server_header_on_every_response() {
        let f = fixture();
        for uri in ["/", "/notes.txt", "/missing", "/../x"] {
            let (_, resp) = send(&f, Method::GET, uri).await;
            assert_eq!(resp.headers()[hyper::header::SERVER], "dirserve-test", "{uri}");
        }
    }
}
