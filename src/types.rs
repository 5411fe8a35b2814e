//! JSON bodies exchanged with the gallery page.
//!
//! These are the only shapes the presentation layer sees:
//!
//! ```text
//! GET    /api/list      → {"files": ["a.jpg", "b/c.mp4"]}
//! DELETE /api/delete    → {"ok": true}
//! POST   /api/favorite  → {"ok": true, "overwritten": false}
//! any failure           → {"ok": false, "error": "File not found"}
//! ```

use crate::operations::{DeleteOutcome, FavoriteOutcome, OperationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaList {
    pub files: Vec<String>,
}

/// Outcome of a delete or favorite request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Favorite only: an existing favorite was replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwritten: Option<bool>,
}

impl OperationResult {
    pub fn failed(error: &OperationError) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
            overwritten: None,
        }
    }
}

impl From<DeleteOutcome> for OperationResult {
    fn from(_: DeleteOutcome) -> Self {
        Self {
            ok: true,
            error: None,
            overwritten: None,
        }
    }
}

impl From<FavoriteOutcome> for OperationResult {
    fn from(outcome: FavoriteOutcome) -> Self {
        Self {
            ok: true,
            error: None,
            overwritten: Some(outcome.overwritten),
        }
    }
}
