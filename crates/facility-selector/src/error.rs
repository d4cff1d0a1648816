//! Error types for inventory loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating an inventory.
///
/// Allocation itself never fails: shortages and overflow are reported as
/// [`SelectionOutcome`](triage_core::SelectionOutcome) variants.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("failed to read inventory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("inventory parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two facilities of the same kind share a name.
    #[error("duplicate facility: {0}")]
    DuplicateFacility(String),

    /// A facility violates a capacity or distance invariant.
    #[error("invalid facility {facility}: {reason}")]
    InvalidFacility { facility: String, reason: String },
}
