//! Responder trait definition.

use triage_core::{EmergencyReport, ResponderCategory, ResponderReply};

use crate::status::ResponderStatus;

/// A responder service that owns a facility inventory.
///
/// Methods take `&mut self` and are only ever called from the responder's
/// own actor task, which processes one message at a time. That is what
/// keeps the inventory invariants without locking.
pub trait Responder: Send + 'static {
    /// Category this responder serves.
    fn category(&self) -> ResponderCategory;

    /// Select and reserve resources for a report.
    ///
    /// Always produces a reply: shortages and overflow are outcomes.
    fn handle_report(&mut self, report: &EmergencyReport) -> ResponderReply;

    /// Structured view of the current inventory.
    fn status(&self) -> ResponderStatus;

    /// Return dispatched units to service. Responders without a unit
    /// pool return nothing.
    fn release(&mut self, _count: u32) -> u32 {
        0
    }
}
