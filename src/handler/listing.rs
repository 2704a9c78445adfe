//! Directory listing module
//!
//! Reads one directory level and renders it as a single HTML page.

use crate::error::ServeError;
use crate::handler::display::{
    child_href, escape_html, format_modified, format_size, parent_href,
};
use crate::logger;
use std::path::Path;
use std::time::SystemTime;

/// One row of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// File name, with a trailing `/` for directories
    pub display_name: String,
    pub is_directory: bool,
    /// `None` for directories
    pub size_bytes: Option<u64>,
    pub last_modified: SystemTime,
    pub link_href: String,
}

/// A rendered-on-demand listing for one directory
#[derive(Debug, Clone)]
pub struct Listing {
    /// Decoded request path the listing answers, lossily converted for display
    pub request_path: String,
    /// Header text, usually `~/`-relative
    pub display_path: String,
    /// Link for the `..` row; `None` at the served root
    pub parent_href: Option<String>,
    /// Children in directory-read order
    pub entries: Vec<DirectoryEntry>,
}

/// Read the immediate children of `dir`.
///
/// Failing to open or iterate the directory fails the whole listing. A child
/// whose metadata cannot be read (broken symlink, vanished file, ...) is skipped.
/// Names that are not valid UTF-8 are shown lossily but linked by their raw bytes.
pub async fn read_entries(dir: &Path, request_path: &[u8]) -> Result<Vec<DirectoryEntry>, ServeError> {
    let mut read_dir = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ServeError::from_io(dir, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| ServeError::from_io(dir, e))?
    {
        let file_name = entry.file_name();

        // Follows symlinks so a linked directory lists as a directory
        let metadata = match tokio::fs::metadata(entry.path()).await {
            Ok(m) => m,
            Err(e) => {
                logger::log_debug(&format!(
                    "Skipping {}: metadata unavailable: {e}",
                    entry.path().display()
                ));
                continue;
            }
        };
        let Ok(last_modified) = metadata.modified() else {
            logger::log_debug(&format!(
                "Skipping {}: modification time unavailable",
                entry.path().display()
            ));
            continue;
        };

        let is_directory = metadata.is_dir();
        let name = file_name.to_string_lossy();
        entries.push(DirectoryEntry {
            link_href: child_href(request_path, file_name.as_encoded_bytes(), is_directory),
            display_name: if is_directory {
                format!("{name}/")
            } else {
                name.into_owned()
            },
            is_directory,
            size_bytes: (!is_directory).then(|| metadata.len()),
            last_modified,
        });
    }

    Ok(entries)
}

impl Listing {
    /// Build the listing for a directory; the parent row is omitted at the root.
    pub async fn build(
        dir: &Path,
        request_path: &[u8],
        is_root: bool,
        display_path: String,
    ) -> Result<Self, ServeError> {
        let entries = read_entries(dir, request_path).await?;
        Ok(Self {
            request_path: String::from_utf8_lossy(request_path).into_owned(),
            display_path,
            parent_href: (!is_root).then(|| parent_href(request_path)),
            entries,
        })
    }

    /// Render the whole page
    pub fn render(&self) -> String {
        let mut rows = String::new();

        if let Some(href) = &self.parent_href {
            rows.push_str(&format!(
                r#"            <tr class="parent"><td><a href="{}">..</a></td><td>-</td><td>-</td></tr>
"#,
                escape_html(href)
            ));
        }

        for entry in &self.entries {
            let size = entry
                .size_bytes
                .map_or_else(|| "-".to_string(), format_size);
            let class = if entry.is_directory { "dir" } else { "file" };
            rows.push_str(&format!(
                r#"            <tr class="{class}"><td><a href="{}">{}</a></td><td>{size}</td><td>{}</td></tr>
"#,
                escape_html(&entry.link_href),
                escape_html(&entry.display_name),
                format_modified(entry.last_modified),
            ));
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>File Server - {title}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f3f4f6; color: #111827; margin: 0; padding: 24px; }}
        .container {{ max-width: 960px; margin: 0 auto; }}
        h1 {{ font-size: 1.75em; margin-bottom: 24px; word-break: break-all; }}
        table {{ width: 100%; border-collapse: collapse; background: #fff; border-radius: 8px; overflow: hidden; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1); }}
        th {{ background: #2563eb; color: #fff; text-align: left; padding: 12px 16px; }}
        td {{ padding: 8px 16px; border-top: 1px solid #e5e7eb; }}
        tr:hover td {{ background: #f9fafb; }}
        a {{ color: #2563eb; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        tr.dir a {{ font-weight: 600; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Directory: {header}</h1>
        <table>
            <thead>
                <tr><th>Name</th><th>Size</th><th>Last Modified</th></tr>
            </thead>
            <tbody>
{rows}            </tbody>
        </table>
    </div>
</body>
</html>
"#,
            title = escape_html(&self.request_path),
            header = escape_html(&self.display_path),
        )
    }
}
