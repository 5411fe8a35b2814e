//! # Gala
//!
//! A local-network media browser. Point it at a directory and it serves every
//! image and video below it as a full-screen, swipeable gallery, with two
//! side-effecting actions: delete and favorite.
//!
//! # Architecture
//!
//! Every request that names a file goes through the same path-safety layer
//! before anything touches the disk:
//!
//! ```text
//! HTTP  ─►  server   ─►  operations  ─►  resolve  ─►  naming  ─►  filesystem
//!                            │
//!                            └─►  scan  ─►  media
//! ```
//!
//! The served root is the only trust boundary. Client filenames are decoded,
//! canonicalized and checked for containment in one place ([`resolve`]); no
//! other code builds a path from client input.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`media`] | Supported extensions and the reserved `deleted/` and `favorites/` subtrees |
//! | [`scan`] | Recursive, sorted listing of the media under root |
//! | [`resolve`] | Client filename → contained absolute + relative path |
//! | [`naming`] | Destination paths in the reserved subtrees, collision suffixes |
//! | [`operations`] | Delete and favorite, with the error taxonomy |
//! | [`types`] | JSON bodies for the API |
//! | [`render`] | The gallery page (Maud) |
//! | [`server`] | Axum routes and status mapping |
//! | [`config`] | TOML config loading, merging, and validation |
//! | [`history`] | The recently-served-directories file |
//! | [`output`] | Console output |
//!
//! # Design Decisions
//!
//! ## Delete Is a Move
//!
//! Nothing is ever unlinked. Delete moves the file into `deleted/` under the
//! same relative path, adding `_1`, `_2`, ... to the stem rather than
//! overwriting an earlier delete. Recovering a file is a plain `mv`.
//!
//! ## Favorites Are Copies
//!
//! Favorite copies into `favorites/` and leaves the original in place. Here
//! overwriting is intended: favoriting an edited file again replaces the old
//! copy, and the response says so.
//!
//! ## No Index
//!
//! Every listing walks the disk. There is no cache to invalidate, and files
//! added or removed outside the gallery show up on the next page load.

pub mod config;
pub mod history;
pub mod media;
pub mod naming;
pub mod operations;
pub mod output;
pub mod render;
pub mod resolve;
pub mod scan;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
