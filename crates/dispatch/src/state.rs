//! Per-report lifecycle tracked by the coordinator.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use triage_core::{ClassificationResult, EmergencyReport, EmergencyResponse, ResponderCategory};

/// Lifecycle of a report.
///
/// `New -> Classified -> Dispatched -> (PartiallyConfirmed | Confirmed)`,
/// with `Stale` entered from `Dispatched` or `PartiallyConfirmed` when the
/// response deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportState {
    New,
    Classified,
    Dispatched,
    PartiallyConfirmed,
    Confirmed,
    Stale,
}

impl ReportState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Classified => "classified",
            Self::Dispatched => "dispatched",
            Self::PartiallyConfirmed => "partially_confirmed",
            Self::Confirmed => "confirmed",
            Self::Stale => "stale",
        }
    }

    /// Still waiting on at least one responder.
    pub fn is_awaiting(&self) -> bool {
        matches!(self, Self::Dispatched | Self::PartiallyConfirmed)
    }
}

impl fmt::Display for ReportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest response received from one category for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub responder_id: String,
    pub response: EmergencyResponse,
    pub received_at: DateTime<Utc>,
    /// Number of responses seen for this pair; above 1 means duplicates.
    pub deliveries: u32,
}

/// A resident report and everything the coordinator knows about it.
#[derive(Debug, Clone, Serialize)]
pub struct TrackedReport {
    pub report: EmergencyReport,
    pub classification: ClassificationResult,
    pub state: ReportState,
    /// Categories routing selected.
    pub targets: Vec<ResponderCategory>,
    /// Categories that actually received the report.
    pub dispatched: Vec<ResponderCategory>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub records: IndexMap<ResponderCategory, DispatchRecord>,
}

impl TrackedReport {
    pub(crate) fn new(report: EmergencyReport, classification: ClassificationResult) -> Self {
        Self {
            report,
            classification,
            state: ReportState::New,
            targets: Vec::new(),
            dispatched: Vec::new(),
            dispatched_at: None,
            records: IndexMap::new(),
        }
    }

    /// Every dispatched category has answered.
    pub fn fully_answered(&self) -> bool {
        !self.dispatched.is_empty() && self.dispatched.iter().all(|c| self.records.contains_key(c))
    }

    /// Dispatched categories that have not answered yet.
    pub fn pending(&self) -> Vec<ResponderCategory> {
        self.dispatched
            .iter()
            .copied()
            .filter(|c| !self.records.contains_key(c))
            .collect()
    }

    pub(crate) fn past_deadline(&self, now: DateTime<Utc>, deadline: Duration) -> bool {
        match self.dispatched_at {
            Some(at) => (now - at).to_std().map(|elapsed| elapsed >= deadline).unwrap_or(false),
            None => false,
        }
    }

    /// State after a response has been recorded.
    pub(crate) fn settle(&mut self) {
        if self.fully_answered() {
            self.state = ReportState::Confirmed;
        } else if self.state != ReportState::Stale {
            self.state = ReportState::PartiallyConfirmed;
        }
    }
}
