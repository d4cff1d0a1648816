//! Coordinator actor: owns the [`DispatchCoordinator`] and sweeps stale reports.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};
use triage_core::{EmergencyResponse, InboundContent, ReportDraft, ResponseSink, TriageError};

use crate::coordinator::{DispatchCoordinator, InboundReply, ResponseOutcome, SubmitReceipt};
use crate::dispatcher::Dispatcher;
use crate::optimizer::RankedReport;
use crate::state::TrackedReport;
use crate::status::{StatusReport, StatusSummary};

const COORDINATOR_ID: &str = "coordinator";

/// Messages accepted by the coordinator task.
pub enum CoordinatorMessage {
    Submit {
        draft: ReportDraft,
        reply: oneshot::Sender<SubmitReceipt>,
    },
    Inbound {
        sender: String,
        content: InboundContent,
        reply: oneshot::Sender<InboundReply>,
    },
    Response {
        responder_id: String,
        response: EmergencyResponse,
        reply: Option<oneshot::Sender<ResponseOutcome>>,
    },
    Summary {
        reply: oneshot::Sender<StatusSummary>,
    },
    StatusQuery {
        query: String,
        reply: oneshot::Sender<StatusReport>,
    },
    RankOpen {
        reply: oneshot::Sender<Vec<RankedReport>>,
    },
    Report {
        report_id: String,
        reply: oneshot::Sender<Option<TrackedReport>>,
    },
    SweepNow {
        reply: oneshot::Sender<Vec<String>>,
    },
    Shutdown,
}

/// Cloneable address of the coordinator task.
///
/// Also the [`ResponseSink`] responders deliver into.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<CoordinatorMessage>,
}

/// Receiving half, held until the coordinator is ready to run.
pub struct CoordinatorMailbox {
    rx: mpsc::Receiver<CoordinatorMessage>,
}

impl CoordinatorHandle {
    /// Create the coordinator's mailbox before the coordinator itself.
    ///
    /// Responders need the handle as their sink before the dispatcher that
    /// points at them exists.
    pub fn channel(capacity: usize) -> (Self, CoordinatorMailbox) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, CoordinatorMailbox { rx })
    }

    pub async fn submit(&self, draft: ReportDraft) -> Result<SubmitReceipt, TriageError> {
        self.request(|reply| CoordinatorMessage::Submit { draft, reply }).await
    }

    pub async fn inbound(
        &self,
        sender: impl Into<String>,
        content: InboundContent,
    ) -> Result<InboundReply, TriageError> {
        let sender = sender.into();
        self.request(|reply| CoordinatorMessage::Inbound {
            sender,
            content,
            reply,
        })
        .await
    }

    /// Deliver a response and wait for the coordinator's verdict.
    pub async fn record_response(
        &self,
        responder_id: impl Into<String>,
        response: EmergencyResponse,
    ) -> Result<ResponseOutcome, TriageError> {
        let responder_id = responder_id.into();
        self.request(|reply| CoordinatorMessage::Response {
            responder_id,
            response,
            reply: Some(reply),
        })
        .await
    }

    pub async fn summary(&self) -> Result<StatusSummary, TriageError> {
        self.request(|reply| CoordinatorMessage::Summary { reply }).await
    }

    pub async fn status_query(&self, query: impl Into<String>) -> Result<StatusReport, TriageError> {
        let query = query.into();
        self.request(|reply| CoordinatorMessage::StatusQuery { query, reply })
            .await
    }

    pub async fn rank_open(&self) -> Result<Vec<RankedReport>, TriageError> {
        self.request(|reply| CoordinatorMessage::RankOpen { reply }).await
    }

    pub async fn report(&self, report_id: impl Into<String>) -> Result<Option<TrackedReport>, TriageError> {
        let report_id = report_id.into();
        self.request(|reply| CoordinatorMessage::Report { report_id, reply })
            .await
    }

    /// Run the stale sweep immediately; yields the ids that expired.
    pub async fn sweep_now(&self) -> Result<Vec<String>, TriageError> {
        self.request(|reply| CoordinatorMessage::SweepNow { reply }).await
    }

    /// Ask the coordinator to stop. Queued messages ahead of this one are
    /// still processed.
    pub async fn shutdown(&self) -> Result<(), TriageError> {
        self.tx
            .send(CoordinatorMessage::Shutdown)
            .await
            .map_err(|_| TriageError::MailboxClosed(COORDINATOR_ID.to_string()))
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> CoordinatorMessage,
    ) -> Result<T, TriageError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| TriageError::MailboxClosed(COORDINATOR_ID.to_string()))?;
        rx.await
            .map_err(|_| TriageError::NoReply(COORDINATOR_ID.to_string()))
    }
}

#[async_trait]
impl ResponseSink for CoordinatorHandle {
    async fn deliver(
        &self,
        responder_id: &str,
        response: EmergencyResponse,
    ) -> Result<(), TriageError> {
        self.tx
            .send(CoordinatorMessage::Response {
                responder_id: responder_id.to_string(),
                response,
                reply: None,
            })
            .await
            .map_err(|_| TriageError::MailboxClosed(COORDINATOR_ID.to_string()))
    }
}

impl CoordinatorMailbox {
    /// Spawn the coordinator task on the current runtime.
    pub fn spawn<D: Dispatcher + 'static>(
        self,
        coordinator: DispatchCoordinator<D>,
        sweep_interval: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(run(coordinator, self.rx, sweep_interval))
    }
}

/// Create the mailbox and spawn `coordinator` in one step.
pub fn spawn_coordinator<D: Dispatcher + 'static>(
    coordinator: DispatchCoordinator<D>,
    capacity: usize,
    sweep_interval: Duration,
) -> (CoordinatorHandle, JoinHandle<()>) {
    let (handle, mailbox) = CoordinatorHandle::channel(capacity);
    let task = mailbox.spawn(coordinator, sweep_interval);
    (handle, task)
}

async fn run<D: Dispatcher>(
    mut coordinator: DispatchCoordinator<D>,
    mut rx: mpsc::Receiver<CoordinatorMessage>,
    sweep_interval: Duration,
) {
    let sweep_interval = sweep_interval.max(Duration::from_millis(1));
    let mut sweep = interval_at(Instant::now() + sweep_interval, sweep_interval);
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(sweep_interval = ?sweep_interval, "Coordinator started");

    loop {
        let message = tokio::select! {
            message = rx.recv() => message,
            _ = sweep.tick() => {
                let expired = coordinator.expire_stale(Utc::now());
                if !expired.is_empty() {
                    debug!(count = expired.len(), "Stale sweep expired reports");
                }
                continue;
            }
        };

        let Some(message) = message else {
            break;
        };

        match message {
            CoordinatorMessage::Submit { draft, reply } => {
                let receipt = coordinator.submit(draft, Utc::now()).await;
                let _ = reply.send(receipt);
            }
            CoordinatorMessage::Inbound {
                sender,
                content,
                reply,
            } => {
                let answer = coordinator.handle_inbound(&sender, content, Utc::now()).await;
                let _ = reply.send(answer);
            }
            CoordinatorMessage::Response {
                responder_id,
                response,
                reply,
            } => {
                let outcome = coordinator.record_response(&responder_id, response, Utc::now());
                if let Some(reply) = reply {
                    let _ = reply.send(outcome);
                }
            }
            CoordinatorMessage::Summary { reply } => {
                let _ = reply.send(coordinator.summarize());
            }
            CoordinatorMessage::StatusQuery { query, reply } => {
                let _ = reply.send(coordinator.status_query(&query).await);
            }
            CoordinatorMessage::RankOpen { reply } => {
                let _ = reply.send(coordinator.rank_open());
            }
            CoordinatorMessage::Report { report_id, reply } => {
                let _ = reply.send(coordinator.report(&report_id).cloned());
            }
            CoordinatorMessage::SweepNow { reply } => {
                let _ = reply.send(coordinator.expire_stale(Utc::now()));
            }
            CoordinatorMessage::Shutdown => {
                info!("Coordinator shutting down");
                break;
            }
        }
    }

    info!("Coordinator stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::DispatchConfig;
    use crate::dispatcher::NoOpDispatcher;
    use crate::state::ReportState;
    use knowledge_base::KnowledgeBase;

    fn spawn(config: &DispatchConfig) -> (CoordinatorHandle, JoinHandle<()>) {
        let coordinator = DispatchCoordinator::new(
            Arc::new(KnowledgeBase::builtin().unwrap()),
            NoOpDispatcher,
            config,
        );
        spawn_coordinator(coordinator, config.mailbox_capacity, config.stale_sweep_interval)
    }

    #[tokio::test]
    async fn test_submit_and_respond_through_handle() {
        let (handle, _task) = spawn(&DispatchConfig::default());

        let receipt = handle
            .submit(ReportDraft::text("man unconscious after accident").with_id("EM-1"))
            .await
            .unwrap();
        assert_eq!(receipt.state, ReportState::Dispatched);

        handle
            .deliver("medical", EmergencyResponse::new("EM-1", "ok", 1, "sent"))
            .await
            .unwrap();
        let tracked = handle.report("EM-1").await.unwrap().unwrap();
        assert_eq!(tracked.state, ReportState::Confirmed);

        let summary = handle.summary().await.unwrap();
        assert_eq!(summary.active_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_sweep_marks_stale() {
        let config = DispatchConfig::default()
            .with_response_deadline(Duration::ZERO)
            .with_stale_sweep_interval(Duration::from_secs(30));
        let (handle, _task) = spawn(&config);

        handle
            .submit(ReportDraft::text("smoke and flames").with_id("EM-1"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(31)).await;

        let tracked = handle.report("EM-1").await.unwrap().unwrap();
        assert_eq!(tracked.state, ReportState::Stale);
    }

    #[tokio::test]
    async fn test_shutdown_closes_mailbox() {
        let (handle, task) = spawn(&DispatchConfig::default());
        handle.shutdown().await.unwrap();
        task.await.unwrap();

        assert!(matches!(
            handle.summary().await,
            Err(TriageError::MailboxClosed(_))
        ));
    }
}
