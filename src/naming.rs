//! Destination naming for the reserved subtrees.
//!
//! Both subtrees mirror the relative layout of the served root:
//!
//! ```text
//! root/albums/summer/beach.jpg
//!   delete   → root/deleted/albums/summer/beach.jpg
//!   favorite → root/favorites/albums/summer/beach.jpg
//! ```
//!
//! ## Collisions
//!
//! `deleted/` never overwrites. When the mirrored path is taken, the stem gets
//! the smallest free numeric suffix:
//!
//! - `beach.jpg` → `beach_1.jpg` → `beach_2.jpg` ...
//! - `archive.tar.gz` → `archive.tar_1.gz`
//! - `README` → `README_1`
//!
//! `favorites/` always reuses the mirrored path; the latest copy wins.

use crate::media::{DELETED_DIR, FAVORITES_DIR};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Upper bound on the collision suffix search in `deleted/`.
pub const MAX_COLLISION_SUFFIX: u32 = 1_000_000;

/// Compute a free path under `root/deleted/` for `relative`, creating parents.
pub fn delete_destination(root: &Path, relative: &Path) -> io::Result<PathBuf> {
    delete_destination_bounded(root, relative, MAX_COLLISION_SUFFIX)
}

/// [`delete_destination`] with an explicit upper bound on the suffix.
pub(crate) fn delete_destination_bounded(
    root: &Path,
    relative: &Path,
    max_suffix: u32,
) -> io::Result<PathBuf> {
    let destination = root.join(DELETED_DIR).join(relative);
    ensure_parent(&destination)?;

    if !exists(&destination) {
        return Ok(destination);
    }

    (1..=max_suffix)
        .map(|index| suffixed(&destination, index))
        .find(|candidate| !exists(candidate))
        .ok_or_else(|| {
            io::Error::other(format!(
                "Could not determine destination filename for {}",
                relative.display()
            ))
        })
}

/// Compute the path under `root/favorites/` for `relative`, creating parents.
///
/// An existing file at that path is left for the caller to overwrite.
pub fn favorite_destination(root: &Path, relative: &Path) -> io::Result<PathBuf> {
    let destination = root.join(FAVORITES_DIR).join(relative);
    ensure_parent(&destination)?;
    Ok(destination)
}

/// `dir/stem.ext` → `dir/stem_<index>.ext`
pub fn suffixed(path: &Path, index: u32) -> PathBuf {
    let mut name = OsString::new();
    if let Some(stem) = path.file_stem() {
        name.push(stem);
    }
    name.push(format!("_{index}"));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

// Dangling symlinks count as taken.
fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(
            suffixed(Path::new("/r/deleted/beach.jpg"), 1),
            Path::new("/r/deleted/beach_1.jpg")
        );
        assert_eq!(
            suffixed(Path::new("/r/deleted/archive.tar.gz"), 3),
            Path::new("/r/deleted/archive.tar_3.gz")
        );
    }

    #[test]
    fn suffix_without_extension() {
        assert_eq!(
            suffixed(Path::new("/r/deleted/README"), 2),
            Path::new("/r/deleted/README_2")
        );
        assert_eq!(
            suffixed(Path::new("/r/deleted/.hidden"), 1),
            Path::new("/r/deleted/.hidden_1")
        );
    }

    #[test]
    fn delete_destination_mirrors_relative_path() {
        let tmp = TempDir::new().unwrap();
        let dest = delete_destination(tmp.path(), Path::new("albums/summer/beach.jpg")).unwrap();

        assert_eq!(dest, tmp.path().join("deleted/albums/summer/beach.jpg"));
        assert!(tmp.path().join("deleted/albums/summer").is_dir());
        assert!(!dest.exists());
    }

    #[test]
    fn delete_destination_picks_smallest_free_suffix() {
        let tmp = TempDir::new().unwrap();
        let deleted = tmp.path().join("deleted");
        fs::create_dir_all(&deleted).unwrap();
        fs::write(deleted.join("a.png"), b"0").unwrap();
        fs::write(deleted.join("a_1.png"), b"1").unwrap();
        fs::write(deleted.join("a_3.png"), b"3").unwrap();

        let dest = delete_destination(tmp.path(), Path::new("a.png")).unwrap();
        assert_eq!(dest, deleted.join("a_2.png"));
    }

    #[test]
    fn delete_destination_first_collision_gets_one() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("deleted")).unwrap();
        fs::write(tmp.path().join("deleted/clip.mp4"), b"x").unwrap();

        let dest = delete_destination(tmp.path(), Path::new("clip.mp4")).unwrap();
        assert_eq!(dest, tmp.path().join("deleted/clip_1.mp4"));
    }

    #[test]
    fn delete_destination_gives_up_past_bound() {
        let tmp = TempDir::new().unwrap();
        let deleted = tmp.path().join("deleted");
        fs::create_dir_all(&deleted).unwrap();
        for name in ["a.png", "a_1.png", "a_2.png"] {
            fs::write(deleted.join(name), name).unwrap();
        }

        let err = delete_destination_bounded(tmp.path(), Path::new("a.png"), 2).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(err.to_string().contains("a.png"));

        let dest = delete_destination_bounded(tmp.path(), Path::new("a.png"), 3).unwrap();
        assert_eq!(dest, deleted.join("a_3.png"));
    }

    #[test]
    fn favorite_destination_does_not_rename() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("favorites/albums")).unwrap();
        fs::write(tmp.path().join("favorites/albums/a.png"), b"old").unwrap();

        let dest = favorite_destination(tmp.path(), Path::new("albums/a.png")).unwrap();
        assert_eq!(dest, tmp.path().join("favorites/albums/a.png"));
    }

    #[test]
    fn favorite_destination_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let dest = favorite_destination(tmp.path(), Path::new("x/y/z.gif")).unwrap();
        assert!(dest.parent().unwrap().is_dir());
    }
}
