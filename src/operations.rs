//! Delete and favorite.
//!
//! Both operations share one shape:
//!
//! ```text
//! filename ─► present? ─► resolve ─► validate ─► mutate ─► outcome
//!               │           │           │          │
//!        MissingFilename InvalidPath  NotFound   NotFound / PermissionDenied
//!                                   UnsupportedType  / Server
//! ```
//!
//! - **Delete** moves the file (or directory) into `deleted/`, mirroring its
//!   relative path and never overwriting (see [`crate::naming`]).
//! - **Favorite** copies a media file into `favorites/`, keeping the original
//!   in place. An existing favorite is overwritten and the outcome says so.
//!
//! Every filesystem error is translated into an [`OperationError`] here, so
//! the HTTP layer only ever sees the taxonomy below.
//!
//! There is no locking around resolve-then-mutate. Two concurrent deletes of
//! the same file are settled by the filesystem: the loser sees `NotFound`.

use crate::media::{DELETED_DIR, has_supported_extension, is_in_reserved_subtree};
use crate::naming;
use crate::resolve::{self, InvalidPath, MediaRoot, ResolvedPath};
use crate::scan;
use std::fs::{self, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("Missing filename")]
    MissingFilename,
    #[error("Invalid file path")]
    InvalidPath,
    #[error("File not found")]
    NotFound,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Only supported media files can be favorited")]
    UnsupportedType,
    #[error("{0}")]
    Server(String),
}

impl OperationError {
    /// Errors caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, OperationError::Server(_))
    }
}

impl From<InvalidPath> for OperationError {
    fn from(_: InvalidPath) -> Self {
        OperationError::InvalidPath
    }
}

impl From<io::Error> for OperationError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => OperationError::NotFound,
            io::ErrorKind::PermissionDenied => OperationError::PermissionDenied,
            _ => OperationError::Server(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Relative path of the deleted file.
    pub source: PathBuf,
    /// Where it now lives under `deleted/`.
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// A previous favorite at `destination` was replaced.
    pub overwritten: bool,
}

/// File operations bound to one served root.
#[derive(Debug, Clone)]
pub struct FileOperations {
    root: MediaRoot,
}

impl FileOperations {
    pub fn new(root: MediaRoot) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &MediaRoot {
        &self.root
    }

    /// Current media listing. Never fails; see [`scan::list_media`].
    pub fn list(&self) -> Vec<String> {
        scan::list_media(self.root.path())
    }

    /// Move `filename` into `deleted/`.
    pub fn delete(&self, filename: &str) -> Result<DeleteOutcome, OperationError> {
        let source = self.resolve_filename(filename)?;
        if source.is_root() || is_reserved_dir(&source.relative) {
            return Err(OperationError::InvalidPath);
        }
        // `deleted/deleted` would be moved into its own subtree.
        let mirrored = self.root.path().join(DELETED_DIR).join(&source.relative);
        if mirrored.starts_with(&source.absolute) {
            return Err(OperationError::InvalidPath);
        }

        // Checked up front so a missing file leaves no empty directories behind.
        fs::symlink_metadata(&source.absolute)?;

        let destination = naming::delete_destination(self.root.path(), &source.relative)?;
        move_path(&source.absolute, &destination)?;

        tracing::info!(
            file = %source.relative.display(),
            destination = %destination.display(),
            "moved to deleted"
        );
        Ok(DeleteOutcome {
            source: source.relative,
            destination,
        })
    }

    /// Copy `filename` into `favorites/`, overwriting any previous favorite.
    pub fn favorite(&self, filename: &str) -> Result<FavoriteOutcome, OperationError> {
        let source = self.resolve_filename(filename)?;
        if is_in_reserved_subtree(&source.relative) {
            return Err(OperationError::InvalidPath);
        }

        let metadata = fs::metadata(&source.absolute)?;
        if !metadata.is_file() {
            return Err(OperationError::NotFound);
        }
        if !has_supported_extension(&source.absolute) {
            return Err(OperationError::UnsupportedType);
        }

        let destination = naming::favorite_destination(self.root.path(), &source.relative)?;
        let overwritten = destination.exists();
        copy_file(&source.absolute, &destination)?;

        tracing::info!(
            file = %source.relative.display(),
            destination = %destination.display(),
            overwritten,
            "copied to favorites"
        );
        Ok(FavoriteOutcome {
            source: source.relative,
            destination,
            overwritten,
        })
    }

    fn resolve_filename(&self, filename: &str) -> Result<ResolvedPath, OperationError> {
        if filename.is_empty() {
            return Err(OperationError::MissingFilename);
        }
        Ok(resolve::resolve(&self.root, filename)?)
    }
}

/// `deleted` or `favorites` themselves, as opposed to something inside them.
fn is_reserved_dir(relative: &Path) -> bool {
    relative.components().count() == 1 && is_in_reserved_subtree(relative)
}

/// Rename, falling back to copy-and-remove across filesystems.
fn move_path(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(
                source = %source.display(),
                "rename crosses filesystems, copying instead"
            );
            copy_then_remove(source, destination)
        }
        Err(err) => Err(err),
    }
}

fn copy_then_remove(source: &Path, destination: &Path) -> io::Result<()> {
    let is_dir = source.is_dir();
    let copied = if is_dir {
        copy_dir_recursive(source, destination)
    } else {
        copy_file(source, destination)
    };
    if let Err(err) = copied {
        discard_partial(destination);
        return Err(err);
    }

    let removed = if is_dir {
        fs::remove_dir_all(source)
    } else {
        fs::remove_file(source)
    };
    // A file that could not be removed is still intact, so drop the copy.
    // A directory may be half-removed by now and the copy is the only full one.
    if let Err(err) = removed {
        if !is_dir {
            discard_partial(destination);
        }
        return Err(err);
    }
    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            copy_file(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Copy contents and permissions, then carry over access/modification times.
fn copy_file(source: &Path, destination: &Path) -> io::Result<()> {
    fs::copy(source, destination)?;

    let metadata = fs::metadata(source)?;
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    // Read-only handle: the copy may have inherited read-only permissions.
    if let Err(err) = fs::File::open(destination).and_then(|f| f.set_times(times)) {
        tracing::warn!(
            destination = %destination.display(),
            error = %err,
            "could not preserve file times"
        );
    }
    Ok(())
}

fn discard_partial(path: &Path) {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    if let Err(err) = result
        && err.kind() != io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %err, "could not remove partial copy");
    }
}
