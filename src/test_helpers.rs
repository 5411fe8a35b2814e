//! Shared test utilities for the gala test suite.
//!
//! Builds throwaway media trees and reads them back.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = media_tree(&["b.png", "a.jpg", "c/d.mp4"]);
//! let root = open_root(&tmp);
//! assert_eq!(read(&root.path().join("c/d.mp4")), "c/d.mp4");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::resolve::MediaRoot;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory holding each relative path as a file, in order.
///
/// Every file's content is its own relative path, so tests can tell copies
/// and moves apart without extra bookkeeping.
pub fn media_tree(files: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for file in files {
        write_file(tmp.path(), file, file);
    }
    tmp
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
}

/// Open the temp directory as a canonical media root.
pub fn open_root(tmp: &TempDir) -> MediaRoot {
    MediaRoot::open(tmp.path()).unwrap()
}

// =========================================================================
// Readback
// =========================================================================

/// Read a file as UTF-8. Panics with the path on failure.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}
