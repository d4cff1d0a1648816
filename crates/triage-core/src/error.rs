//! Error types shared across the triage system.

use thiserror::Error;

/// Errors raised at the seams between actors.
///
/// Classification and allocation never fail: they have degraded outcomes
/// instead. These errors cover delivery and lifecycle problems only.
#[derive(Debug, Error)]
pub enum TriageError {
    /// The receiving actor has stopped and its mailbox is closed.
    #[error("mailbox closed: {0}")]
    MailboxClosed(String),

    /// The receiving actor's mailbox is full.
    #[error("mailbox full: {0}")]
    MailboxFull(String),

    /// The actor dropped the reply channel before answering.
    #[error("no reply from {0}")]
    NoReply(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
