//! Error types for dispatch operations.

use facility_selector::AllocationError;
use knowledge_base::KnowledgeError;
use thiserror::Error;
use triage_core::TriageError;

/// Errors that can occur while starting or talking to the coordinator.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Mailbox or reply failure at an actor seam.
    #[error(transparent)]
    Triage(#[from] TriageError),

    /// The fact table failed to load.
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    /// The inventory failed to load.
    #[error(transparent)]
    Inventory(#[from] AllocationError),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Configuration(String),
}
