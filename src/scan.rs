//! Media indexing.
//!
//! Walks the served root and returns every displayable file as a POSIX-style
//! relative path. There is no cached index: every call reads the disk, so a
//! listing always reflects the current state after deletes and favorites.
//!
//! ## Ordering
//!
//! Paths are sorted byte-wise ascending. The presentation layer navigates by
//! index (next, previous, random), so the order must be stable across calls:
//!
//! ```text
//! created: b.png, a.jpg, c/d.mp4
//! listed:  a.jpg, b.png, c/d.mp4
//! ```
//!
//! ## What Gets Skipped
//!
//! - Anything under `deleted/` or `favorites/` at the top level
//! - Unsupported extensions and non-files
//! - Symlinks whose target is not a regular file inside root, or that point
//!   into `deleted/` or `favorites/`
//! - Names that are not valid UTF-8 (they cannot be addressed over HTTP)
//! - Unreadable subtrees (logged at debug level, never fatal)
//!
//! A root that does not exist or cannot be read yields an empty list, which the
//! gallery renders as its empty state.

use crate::media::{has_supported_extension, is_in_reserved_subtree};
use std::fs;
use std::path::{Component, Path};
use walkdir::{DirEntry, WalkDir};

/// List all supported media under `root`, sorted, as relative POSIX paths.
pub fn list_media(root: &Path) -> Vec<String> {
    let root = match fs::canonicalize(root) {
        Ok(root) => root,
        Err(err) => {
            tracing::debug!(root = %root.display(), error = %err, "media root unavailable");
            return Vec::new();
        }
    };

    let mut files: Vec<String> = WalkDir::new(&root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !in_reserved_subtree(&root, entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| is_listable(&root, entry))
        .filter_map(|entry| posix_relative(&root, entry.path()))
        .collect();

    files.sort();
    files
}

fn in_reserved_subtree(root: &Path, entry: &DirEntry) -> bool {
    entry
        .path()
        .strip_prefix(root)
        .map(is_in_reserved_subtree)
        .unwrap_or(false)
}

fn is_listable(root: &Path, entry: &DirEntry) -> bool {
    if !has_supported_extension(entry.path()) {
        return false;
    }

    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    if file_type.is_symlink() {
        // The link itself is listed, but only if it cannot lead outside root
        // or into a reserved subtree.
        return fs::canonicalize(entry.path())
            .map(|target| {
                target.is_file()
                    && target
                        .strip_prefix(root)
                        .is_ok_and(|relative| !is_in_reserved_subtree(relative))
            })
            .unwrap_or(false);
    }
    false
}

/// `root/a/b.png` → `"a/b.png"`, or `None` if any segment is not UTF-8.
fn posix_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments = relative
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<&str>>>()?;
    Some(segments.join("/"))
}
