//! Client filename → filesystem path resolution.
//!
//! This is the only place a filesystem path is built from client input. Every
//! file-targeting request goes through [`resolve`] before anything touches the
//! disk.
//!
//! ## Resolution Steps
//!
//! ```text
//! "albums%2F..%2F..%2Fetc%2Fpasswd"
//!   1. percent-decode once     → "albums/../../etc/passwd"
//!   2. join onto root          → "/srv/media/albums/../../etc/passwd"
//!   3. canonicalize            → "/etc/passwd"
//!   4. containment check       → not under /srv/media → InvalidPath
//! ```
//!
//! Decoding always happens before the containment check, so encoded separators
//! and dot segments get no second chance to escape.
//!
//! Canonicalization resolves symlinks for the part of the path that exists and
//! normalizes the rest lexically. A filename for a file that does not exist
//! still resolves, so callers can report `NotFound` instead of `InvalidPath`.
//! A dangling symlink resolves to wherever it points, so it is checked for
//! containment like any other path and reports `NotFound` when it stays inside.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid file path")]
pub struct InvalidPath;

/// The served directory: canonical, symlink-free, and fixed for the process
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRoot {
    path: PathBuf,
}

impl MediaRoot {
    /// Canonicalize `path` and check it is a directory.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = fs::canonicalize(path.as_ref())?;
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("not a directory: {}", path.display()),
            ));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A client filename that passed the containment check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Canonical absolute path, always `root` or below it.
    pub absolute: PathBuf,
    /// `absolute` relative to root. Empty when the filename names root itself.
    pub relative: PathBuf,
}

impl ResolvedPath {
    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }
}

/// Resolve a raw, still percent-encoded client filename against `root`.
///
/// Rejecting empty filenames is the caller's job; an empty string resolves to
/// root itself.
pub fn resolve(root: &MediaRoot, raw: &str) -> Result<ResolvedPath, InvalidPath> {
    let decoded = urlencoding::decode(raw).map_err(|_| InvalidPath)?;
    if decoded.contains('\0') {
        return Err(InvalidPath);
    }

    let joined = root.path().join(decoded.as_ref());
    let absolute = canonicalize_lenient(&joined).map_err(|_| InvalidPath)?;

    let relative = absolute
        .strip_prefix(root.path())
        .map_err(|_| InvalidPath)?
        .to_path_buf();

    Ok(ResolvedPath { absolute, relative })
}

/// Links followed while resolving one filename before giving up.
const MAX_SYMLINK_HOPS: u32 = 40;

/// Canonicalize the existing prefix of `path`, then append the rest lexically.
fn canonicalize_lenient(path: &Path) -> io::Result<PathBuf> {
    canonicalize_within(path, 0)
}

fn canonicalize_within(path: &Path, hops: u32) -> io::Result<PathBuf> {
    let mut resolved = PathBuf::new();
    // Once a component is missing nothing below it can exist either.
    let mut missing = false;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
                // `missing/..` lands back on real ground; re-check from here.
                missing = fs::symlink_metadata(&resolved).is_err();
            }
            Component::Normal(name) => {
                resolved.push(name);
                if missing {
                    continue;
                }
                match fs::symlink_metadata(&resolved) {
                    Ok(meta) if meta.file_type().is_symlink() => {
                        resolved = match fs::canonicalize(&resolved) {
                            Ok(target) => target,
                            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                                missing = true;
                                follow_dangling(&resolved, hops)?
                            }
                            Err(err) => return Err(err),
                        };
                    }
                    Ok(_) => {}
                    Err(_) => missing = true,
                }
            }
        }
    }

    Ok(resolved)
}

/// Where a dangling link points, resolved as far as the filesystem allows.
fn follow_dangling(link: &Path, hops: u32) -> io::Result<PathBuf> {
    if hops >= MAX_SYMLINK_HOPS {
        return Err(io::Error::other("too many levels of symbolic links"));
    }
    let target = fs::read_link(link)?;
    let base = link.parent().unwrap_or(link);
    canonicalize_within(&base.join(target), hops + 1)
}
