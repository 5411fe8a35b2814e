//! Media classification.
//!
//! Decides whether a filesystem entry is something the gallery can display and
//! whether a relative path lives in one of the reserved subtrees that the
//! server manages itself.
//!
//! ## Supported Formats
//!
//! | Kind  | Extensions                  |
//! |-------|-----------------------------|
//! | Image | `jpg`, `jpeg`, `png`, `gif` |
//! | Video | `webm`, `mp4`               |
//!
//! Matching is on the extension only, case-insensitively. File contents are
//! never sniffed.
//!
//! ## Reserved Subtrees
//!
//! ```text
//! root/
//! ├── deleted/      # where deletes are moved to
//! ├── favorites/    # where favorites are copied to
//! └── ...           # everything else is ordinary media
//! ```
//!
//! Anything whose first path segment is one of these names is excluded from
//! listings and cannot be favorited again.

use std::path::{Component, Path};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
pub const VIDEO_EXTENSIONS: &[&str] = &["webm", "mp4"];

pub const DELETED_DIR: &str = "deleted";
pub const FAVORITES_DIR: &str = "favorites";
pub const RESERVED_DIRS: &[&str] = &[DELETED_DIR, FAVORITES_DIR];

/// How a media file is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Classify a path by its extension alone.
pub fn media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())?;
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

pub fn has_supported_extension(path: &Path) -> bool {
    media_kind(path).is_some()
}

/// True if `path` is a regular file (symlinks followed) with a supported extension.
pub fn is_supported_media(path: &Path) -> bool {
    path.is_file() && has_supported_extension(path)
}

/// True if the first segment of `relative` is `deleted` or `favorites`.
///
/// Only the first segment counts: `albums/deleted/a.png` is ordinary media.
pub fn is_in_reserved_subtree(relative: &Path) -> bool {
    match relative.components().next() {
        Some(Component::Normal(first)) => RESERVED_DIRS.iter().any(|r| first == *r),
        _ => false,
    }
}
