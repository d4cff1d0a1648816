//! Delivery seam between responders and the coordinator.

use async_trait::async_trait;

use crate::error::TriageError;
use crate::response::EmergencyResponse;

/// Destination for responses emitted by responders.
///
/// Abstracted so responders can report to an in-process coordinator, a
/// remote transport, or a test double.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    /// Deliver a response on behalf of the responder identified by `responder_id`.
    async fn deliver(
        &self,
        responder_id: &str,
        response: EmergencyResponse,
    ) -> Result<(), TriageError>;
}

/// A sink that discards every response.
#[derive(Debug, Clone, Default)]
pub struct NoOpSink;

#[async_trait]
impl ResponseSink for NoOpSink {
    async fn deliver(
        &self,
        _responder_id: &str,
        _response: EmergencyResponse,
    ) -> Result<(), TriageError> {
        Ok(())
    }
}

/// A sink that logs every response and drops it.
#[derive(Debug, Clone, Default)]
pub struct LoggingSink;

#[async_trait]
impl ResponseSink for LoggingSink {
    async fn deliver(
        &self,
        responder_id: &str,
        response: EmergencyResponse,
    ) -> Result<(), TriageError> {
        tracing::info!(
            responder = %responder_id,
            report_id = %response.report_id,
            teams = response.teams_assigned,
            "{}: {}",
            response.status,
            response.details
        );
        Ok(())
    }
}
