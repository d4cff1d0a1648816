//! Dispatcher trait and implementations.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use responders::{ResponderHandle, ResponderStatus};
use tokio::time::timeout;
use tracing::info;
use triage_core::{EmergencyReport, ResponderCategory, TriageError};

/// Longest the coordinator waits on a responder for its status.
const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// Delivers classified reports to responder categories.
///
/// Abstracted to support in-process actors, remote transports and tests.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Send one copy of `report` to `category`.
    ///
    /// Must not wait on the responder: a full mailbox is an error, not a
    /// reason to block the coordinator.
    async fn dispatch(
        &self,
        category: ResponderCategory,
        report: EmergencyReport,
    ) -> Result<(), TriageError>;

    /// Responder identifiers this dispatcher sends to, with their category.
    ///
    /// The coordinator accepts responses only from these ids.
    fn responders(&self) -> Vec<(String, ResponderCategory)> {
        ResponderCategory::ALL
            .iter()
            .map(|c| (c.as_str().to_string(), *c))
            .collect()
    }

    /// Inventory status for a category, when the dispatcher can reach it.
    async fn responder_status(
        &self,
        category: ResponderCategory,
    ) -> Result<Option<ResponderStatus>, TriageError> {
        let _ = category;
        Ok(None)
    }
}

/// A no-op dispatcher for testing that discards all reports.
#[derive(Debug, Clone, Default)]
pub struct NoOpDispatcher;

#[async_trait]
impl Dispatcher for NoOpDispatcher {
    async fn dispatch(
        &self,
        _category: ResponderCategory,
        _report: EmergencyReport,
    ) -> Result<(), TriageError> {
        Ok(())
    }
}

/// A dispatcher that logs every report and drops it.
#[derive(Debug, Clone, Default)]
pub struct LoggingDispatcher;

#[async_trait]
impl Dispatcher for LoggingDispatcher {
    async fn dispatch(
        &self,
        category: ResponderCategory,
        report: EmergencyReport,
    ) -> Result<(), TriageError> {
        info!(
            category = %category,
            report_id = report.id(),
            emergency_type = %report.emergency_type(),
            band = %report.band(),
            "Would dispatch report"
        );
        Ok(())
    }
}

/// Dispatches to running responder actors.
#[derive(Debug, Clone, Default)]
pub struct ActorDispatcher {
    handles: IndexMap<ResponderCategory, ResponderHandle>,
}

impl ActorDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a responder, replacing any previous one for its category.
    pub fn with_responder(mut self, handle: ResponderHandle) -> Self {
        self.handles.insert(handle.category(), handle);
        self
    }

    pub fn handle(&self, category: ResponderCategory) -> Option<&ResponderHandle> {
        self.handles.get(&category)
    }
}

#[async_trait]
impl Dispatcher for ActorDispatcher {
    async fn dispatch(
        &self,
        category: ResponderCategory,
        report: EmergencyReport,
    ) -> Result<(), TriageError> {
        match self.handles.get(&category) {
            Some(handle) => handle.try_dispatch(report),
            None => Err(TriageError::MailboxClosed(category.as_str().to_string())),
        }
    }

    fn responders(&self) -> Vec<(String, ResponderCategory)> {
        self.handles
            .values()
            .map(|h| (h.id().to_string(), h.category()))
            .collect()
    }

    async fn responder_status(
        &self,
        category: ResponderCategory,
    ) -> Result<Option<ResponderStatus>, TriageError> {
        match self.handles.get(&category) {
            Some(handle) => timeout(STATUS_TIMEOUT, handle.status())
                .await
                .map_err(|_| TriageError::NoReply(handle.id().to_string()))?
                .map(Some),
            None => Ok(None),
        }
    }
}
