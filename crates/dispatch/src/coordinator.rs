//! Dispatch coordinator: classify, route, fan out, and track responses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use knowledge_base::{Classifier, KnowledgeBase};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use triage_core::{
    ClassificationResult, EmergencyReport, EmergencyResponse, InboundContent, ReportDraft,
    ResponderCategory, SeverityBand,
};

use crate::config::DispatchConfig;
use crate::dispatcher::Dispatcher;
use crate::optimizer::{PriorityOptimizer, RankedReport};
use crate::routing::RoutingRules;
use crate::session::{CitizenSession, SessionSummary, INTAKE_PROMPT};
use crate::state::{DispatchRecord, ReportState, TrackedReport};
use crate::status::{StatusReport, StatusSummary, StatusTopic};

/// What submitting a report did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub report: EmergencyReport,
    pub classification: ClassificationResult,
    pub state: ReportState,
    /// Categories that received the report.
    pub dispatched: Vec<ResponderCategory>,
    /// Categories routing selected but whose send failed.
    pub failed: Vec<ResponderCategory>,
    /// The id was already resident; nothing was classified or dispatched
    /// and the receipt describes the existing report.
    #[serde(default)]
    pub duplicate: bool,
}

/// How an incoming response was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// First response for this `(report, category)` pair.
    Recorded { state: ReportState },
    /// Replaced an earlier response for the same pair.
    Duplicate { state: ReportState },
    UnknownResponder,
    UnknownReport,
    /// The report was never dispatched to this responder's category.
    NotDispatched,
}

/// Reply to one item of session-framed inbound content.
#[derive(Debug, Clone)]
pub enum InboundReply {
    Prompt(String),
    Submitted(Box<SubmitReceipt>),
    SessionEnded(Option<SessionSummary>),
    Unsupported { kind: String },
}

/// State machine for every resident report.
///
/// Owned by a single task; see [`spawn_coordinator`](crate::spawn_coordinator).
pub struct DispatchCoordinator<D: Dispatcher> {
    classifier: Classifier,
    optimizer: PriorityOptimizer,
    dispatcher: D,
    rules: RoutingRules,
    response_deadline: Duration,
    /// Responder id to category.
    registry: IndexMap<String, ResponderCategory>,
    reports: IndexMap<String, TrackedReport>,
    sessions: HashMap<String, CitizenSession>,
}

impl<D: Dispatcher> DispatchCoordinator<D> {
    /// Create a coordinator. Responders known to `dispatcher` are registered.
    pub fn new(knowledge: Arc<KnowledgeBase>, dispatcher: D, config: &DispatchConfig) -> Self {
        let registry = dispatcher.responders().into_iter().collect();
        Self {
            classifier: Classifier::new(knowledge.clone()),
            optimizer: PriorityOptimizer::new(knowledge),
            dispatcher,
            rules: RoutingRules::from(config),
            response_deadline: config.response_deadline,
            registry,
            reports: IndexMap::new(),
            sessions: HashMap::new(),
        }
    }

    /// Accept responses from `responder_id` on behalf of `category`.
    pub fn register_responder(&mut self, responder_id: impl Into<String>, category: ResponderCategory) {
        self.registry.insert(responder_id.into(), category);
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn report(&self, report_id: &str) -> Option<&TrackedReport> {
        self.reports.get(report_id)
    }

    pub fn reports(&self) -> impl Iterator<Item = &TrackedReport> {
        self.reports.values()
    }

    /// Classify a draft, route it and send it to every selected category.
    ///
    /// A category whose send fails is not counted as dispatched. A report
    /// that reaches no category stays `Classified`. A draft whose id is
    /// already resident is refused and the existing report is returned.
    pub async fn submit(&mut self, draft: ReportDraft, now: DateTime<Utc>) -> SubmitReceipt {
        if let Some(existing) = draft.id.as_deref().and_then(|id| self.reports.get(id)) {
            warn!(
                report_id = existing.report.id(),
                state = %existing.state,
                "Report id already in use, submission refused"
            );
            return SubmitReceipt {
                report: existing.report.clone(),
                classification: existing.classification.clone(),
                state: existing.state,
                dispatched: existing.dispatched.clone(),
                failed: Vec::new(),
                duplicate: true,
            };
        }

        let classification = self.classifier.classify(&draft.description);
        let report = EmergencyReport::from_classification(draft, &classification);
        let mut tracked = TrackedReport::new(report.clone(), classification.clone());
        debug!(report_id = report.id(), state = %tracked.state, "Report received");

        tracked.state = ReportState::Classified;
        info!(
            report_id = report.id(),
            emergency_type = %classification.inferred_type,
            severity = classification.severity_score,
            confidence = classification.confidence,
            band = %report.band(),
            "Report classified"
        );

        tracked.targets = self.rules.route(&report, &classification);
        let mut failed = Vec::new();
        for category in tracked.targets.clone() {
            match self.dispatcher.dispatch(category, report.clone()).await {
                Ok(()) => tracked.dispatched.push(category),
                Err(e) => {
                    warn!(report_id = report.id(), category = %category, error = %e, "Dispatch failed");
                    failed.push(category);
                }
            }
        }

        if !tracked.dispatched.is_empty() {
            tracked.state = ReportState::Dispatched;
            tracked.dispatched_at = Some(now);
        }
        info!(
            report_id = report.id(),
            state = %tracked.state,
            dispatched = ?tracked.dispatched,
            "Report routed"
        );

        let receipt = SubmitReceipt {
            report,
            classification,
            state: tracked.state,
            dispatched: tracked.dispatched.clone(),
            failed,
            duplicate: false,
        };
        self.reports.insert(receipt.report.id().to_string(), tracked);
        receipt
    }

    /// Record a responder's response (last write wins) and recompute state.
    pub fn record_response(
        &mut self,
        responder_id: &str,
        response: EmergencyResponse,
        now: DateTime<Utc>,
    ) -> ResponseOutcome {
        let Some(category) = self.registry.get(responder_id).copied() else {
            warn!(responder = responder_id, report_id = %response.report_id, "Response from unknown responder");
            return ResponseOutcome::UnknownResponder;
        };
        let Some(tracked) = self.reports.get_mut(&response.report_id) else {
            warn!(responder = responder_id, report_id = %response.report_id, "Response for unknown report");
            return ResponseOutcome::UnknownReport;
        };
        if !tracked.dispatched.contains(&category) {
            warn!(
                responder = responder_id,
                report_id = %response.report_id,
                category = %category,
                "Response from a category that was not dispatched"
            );
            return ResponseOutcome::NotDispatched;
        }

        let deliveries = tracked.records.get(&category).map_or(0, |r| r.deliveries) + 1;
        tracked.records.insert(
            category,
            DispatchRecord {
                responder_id: responder_id.to_string(),
                response,
                received_at: now,
                deliveries,
            },
        );
        let previous = tracked.state;
        tracked.settle();

        if deliveries > 1 {
            warn!(
                report_id = tracked.report.id(),
                category = %category,
                deliveries,
                "Duplicate response, keeping the latest"
            );
        }
        if previous != tracked.state {
            info!(report_id = tracked.report.id(), from = %previous, to = %tracked.state, "Report state changed");
        }

        if deliveries > 1 {
            ResponseOutcome::Duplicate { state: tracked.state }
        } else {
            ResponseOutcome::Recorded { state: tracked.state }
        }
    }

    /// Mark reports still awaiting responses past their deadline as stale.
    pub fn expire_stale(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let deadline = self.response_deadline;
        let mut expired = Vec::new();
        for tracked in self.reports.values_mut() {
            if tracked.state.is_awaiting() && tracked.past_deadline(now, deadline) {
                tracked.state = ReportState::Stale;
                warn!(
                    report_id = tracked.report.id(),
                    pending = ?tracked.pending(),
                    "Report went stale waiting for responses"
                );
                expired.push(tracked.report.id().to_string());
            }
        }
        expired
    }

    pub fn summarize(&self) -> StatusSummary {
        let mut by_category: IndexMap<ResponderCategory, usize> =
            ResponderCategory::ALL.iter().map(|c| (*c, 0)).collect();
        let mut by_state = IndexMap::new();
        let mut active_count = 0;
        let mut critical_count = 0;

        for tracked in self.reports.values() {
            *by_state.entry(tracked.state).or_insert(0) += 1;
            for category in &tracked.dispatched {
                *by_category.entry(*category).or_insert(0) += 1;
            }
            if tracked.state != ReportState::Confirmed {
                active_count += 1;
                if tracked.report.band() == SeverityBand::Critical {
                    critical_count += 1;
                }
            }
        }

        StatusSummary {
            active_count,
            critical_count,
            by_category,
            by_state,
            total_reports: self.reports.len(),
            citizens_online: self.sessions.len(),
        }
    }

    /// Answer a free-text status query with structured facts.
    pub async fn status_query(&self, query: &str) -> StatusReport {
        let topic = StatusTopic::parse(query);
        let mut responders = Vec::new();
        for category in ResponderCategory::ALL {
            if !topic.includes(category) {
                continue;
            }
            match self.dispatcher.responder_status(category).await {
                Ok(Some(status)) => responders.push(status),
                Ok(None) => {}
                Err(e) => warn!(category = %category, error = %e, "Responder status unavailable"),
            }
        }
        StatusReport {
            summary: self.summarize(),
            responders,
        }
    }

    /// Rank every resident report.
    pub fn rank_open(&self) -> Vec<RankedReport> {
        let reports: Vec<EmergencyReport> =
            self.reports.values().map(|t| t.report.clone()).collect();
        self.optimizer.rank(&reports)
    }

    /// Handle one item of session-framed content from `sender`.
    pub async fn handle_inbound(
        &mut self,
        sender: &str,
        content: InboundContent,
        now: DateTime<Utc>,
    ) -> InboundReply {
        match content {
            InboundContent::SessionStart => {
                self.sessions.insert(sender.to_string(), CitizenSession::new(now));
                info!(sender, "Session started");
                InboundReply::Prompt(INTAKE_PROMPT.to_string())
            }
            InboundContent::Text { text } => {
                if let Some(session) = self.sessions.get_mut(sender) {
                    session.messages += 1;
                }
                let receipt = self.submit(ReportDraft::text(text), now).await;
                InboundReply::Submitted(Box::new(receipt))
            }
            InboundContent::SessionEnd => {
                let summary = self.sessions.remove(sender).map(|session| SessionSummary {
                    sender: sender.to_string(),
                    duration_secs: (now - session.started_at).num_seconds(),
                    messages: session.messages,
                });
                if let Some(summary) = &summary {
                    info!(
                        sender,
                        duration_secs = summary.duration_secs,
                        messages = summary.messages,
                        "Session ended"
                    );
                }
                InboundReply::SessionEnded(summary)
            }
            InboundContent::Unsupported { kind } => {
                warn!(sender, kind = %kind, "Unsupported content");
                InboundReply::Unsupported { kind }
            }
        }
    }
}
