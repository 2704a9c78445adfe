//! Path resolution module
//!
//! Maps a request path onto the served root and enforces containment: the
//! resolved target must be the root itself or nested under it. Every other
//! part of the handler relies on this check having run first.

use crate::error::ServeError;
use percent_encoding::percent_decode_str;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// A request path that passed the containment check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// Decoded request path as sent by the client; not necessarily UTF-8
    pub requested_path: Vec<u8>,
    /// Absolute target under the root
    pub absolute_target: PathBuf,
    is_root: bool,
}

impl ResolvedRequest {
    /// Whether the target is the served root itself
    pub const fn is_root(&self) -> bool {
        self.is_root
    }
}

/// Percent-decode the raw URI path into bytes.
///
/// File names need not be UTF-8, so any byte sequence is accepted except an embedded NUL.
pub fn decode_request_path(raw: &str) -> Result<Vec<u8>, ServeError> {
    let decoded: Vec<u8> = percent_decode_str(raw).collect();
    if decoded.contains(&0) {
        return Err(ServeError::MalformedPath(format!("{raw}: contains NUL")));
    }
    Ok(decoded)
}

/// Non-empty segments of a decoded request path. Both `/` and `\` separate.
pub fn split_segments(path: &[u8]) -> impl Iterator<Item = &[u8]> {
    path.split(|b| *b == b'/' || *b == b'\\')
        .filter(|segment| !segment.is_empty())
}

#[cfg(unix)]
fn segment_to_os(segment: &[u8]) -> Result<&OsStr, ServeError> {
    use std::os::unix::ffi::OsStrExt;
    Ok(OsStr::from_bytes(segment))
}

#[cfg(not(unix))]
fn segment_to_os(segment: &[u8]) -> Result<&OsStr, ServeError> {
    std::str::from_utf8(segment)
        .map(OsStr::new)
        .map_err(|e| ServeError::MalformedPath(e.to_string()))
}

/// Join `request_path` onto `root` one segment at a time.
///
/// `..` is kept as-is here; collapsing happens in [`normalize`]. Backslashes count as
/// separators so `..\..` cannot slip through as a single odd-looking file name.
pub fn join_segments(root: &Path, request_path: &[u8]) -> Result<PathBuf, ServeError> {
    let mut joined = root.to_path_buf();
    for segment in split_segments(request_path) {
        joined.push(segment_to_os(segment)?);
    }
    Ok(joined)
}

/// Lexically resolve `.` and `..` in an absolute path.
///
/// `..` at the filesystem root stays at the root, like `cd /..`.
pub fn normalize(path: &Path) -> Result<PathBuf, ServeError> {
    if !path.is_absolute() {
        return Err(ServeError::MalformedPath(format!(
            "not absolute: {}",
            path.display()
        )));
    }

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                normalized.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
        }
    }
    Ok(normalized)
}

/// Segment-aware containment: `/srv/root-evil` is not inside `/srv/root`.
pub fn is_contained(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Resolve a decoded request path against the canonical `root`.
///
/// Escapes are rejected lexically first. If the target exists it is also
/// canonicalized, so a symlink pointing out of the root is rejected as well.
/// A target that does not exist passes through and is reported as 404 later.
pub async fn resolve(root: &Path, request_path: &[u8]) -> Result<ResolvedRequest, ServeError> {
    let joined = join_segments(root, request_path)?;
    let normalized = normalize(&joined)?;

    if !is_contained(&normalized, root) {
        return Err(ServeError::PathEscape(normalized));
    }

    let absolute_target = match tokio::fs::canonicalize(&normalized).await {
        Ok(canonical) => {
            if !is_contained(&canonical, root) {
                return Err(ServeError::PathEscape(canonical));
            }
            canonical
        }
        Err(e) => match ServeError::from_io(normalized.clone(), e) {
            ServeError::NotFound(_) => normalized,
            other => return Err(other),
        },
    };

    Ok(ResolvedRequest {
        requested_path: request_path.to_vec(),
        is_root: absolute_target == root,
        absolute_target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_tempdir() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        (dir, root)
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_request_path("/a%20b/c.txt").unwrap(), b"/a b/c.txt");
        assert_eq!(decode_request_path("/%2e%2e/x").unwrap(), b"/../x");
        assert_eq!(decode_request_path("/caf%E9").unwrap(), b"/caf\xe9");
        assert!(matches!(
            decode_request_path("/a%00b"),
            Err(ServeError::MalformedPath(_))
        ));
    }

    #[test]
    fn test_join_keeps_parent_segments() {
        let joined = join_segments(Path::new("/srv/data"), b"/a/../b").unwrap();
        assert_eq!(joined, PathBuf::from("/srv/data/a/../b"));

        let joined = join_segments(Path::new("/srv/data"), b"//etc\\passwd").unwrap();
        assert_eq!(joined, PathBuf::from("/srv/data/etc/passwd"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/srv/data/a/../b/./c")).unwrap(),
            PathBuf::from("/srv/data/b/c")
        );
        assert_eq!(
            normalize(Path::new("/srv/data/../../../etc")).unwrap(),
            PathBuf::from("/etc")
        );
        assert!(normalize(Path::new("relative/path")).is_err());
    }

    #[test]
    fn test_containment_is_segment_aware() {
        let root = Path::new("/srv/root");
        assert!(is_contained(Path::new("/srv/root"), root));
        assert!(is_contained(Path::new("/srv/root/a/b"), root));
        assert!(!is_contained(Path::new("/srv/root-evil"), root));
        assert!(!is_contained(Path::new("/srv/root2/file"), root));
        assert!(!is_contained(Path::new("/srv"), root));
    }

    #[tokio::test]
    async fn test_resolve_root() {
        let (_dir, root) = canonical_tempdir();
        for path in ["/", "", "//", "/./", "/sub/.."] {
            let resolved = resolve(&root, path.as_bytes()).await.unwrap();
            assert_eq!(resolved.absolute_target, root, "path {path:?}");
            assert!(resolved.is_root());
        }
    }

    #[tokio::test]
    async fn test_resolve_rejects_escapes() {
        let (_dir, root) = canonical_tempdir();
        let attempts = [
            "/../../etc/passwd",
            "/..",
            "../",
            "/a/../../..",
            "/..\\..\\etc\\passwd",
            "\\..\\..",
            "/./../x",
            "/a/b/../../../../c",
        ];
        for path in attempts {
            let result = resolve(&root, path.as_bytes()).await;
            assert!(
                matches!(result, Err(ServeError::PathEscape(_))),
                "{path:?} resolved to {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_resolve_absolute_looking_stays_inside() {
        let (_dir, root) = canonical_tempdir();
        let resolved = resolve(&root, b"//etc/passwd").await.unwrap();
        assert_eq!(resolved.absolute_target, root.join("etc").join("passwd"));
        assert!(!resolved.is_root());
    }

    #[tokio::test]
    async fn test_resolve_missing_target_passes_through() {
        let (_dir, root) = canonical_tempdir();
        let resolved = resolve(&root, b"/missing.txt").await.unwrap();
        assert_eq!(resolved.absolute_target, root.join("missing.txt"));
        assert_eq!(resolved.requested_path, b"/missing.txt");
    }

    #[tokio::test]
    async fn test_resolve_existing_nested() {
        let (_dir, root) = canonical_tempdir();
        std::fs::create_dir(root.join("img")).unwrap();
        std::fs::write(root.join("img").join("a.png"), b"png").unwrap();

        let resolved = resolve(&root, b"/img/../img/a.png").await.unwrap();
        assert_eq!(resolved.absolute_target, root.join("img").join("a.png"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_symlink_out_of_root() {
        let (_outer, outer_root) = canonical_tempdir();
        let root = outer_root.join("served");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer_root.join("secret.txt"), b"secret").unwrap();
        std::os::unix::fs::symlink(outer_root.join("secret.txt"), root.join("link.txt")).unwrap();
        std::os::unix::fs::symlink(&root, root.join("self")).unwrap();

        let result = resolve(&root, b"/link.txt").await;
        assert!(matches!(result, Err(ServeError::PathEscape(_))));

        // A symlink that stays inside the root is fine
        let resolved = resolve(&root, b"/self").await.unwrap();
        assert!(resolved.is_root());
    }
}
