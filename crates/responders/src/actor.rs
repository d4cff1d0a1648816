//! Actor runtime: one task per responder, fed by a bounded mailbox.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use triage_core::{EmergencyReport, ResponderCategory, ResponderReply, ResponseSink, TriageError};

use crate::config::ResponderConfig;
use crate::status::ResponderStatus;
use crate::trait_def::Responder;

enum Command {
    Handle {
        report: EmergencyReport,
        reply: Option<oneshot::Sender<ResponderReply>>,
    },
    Status {
        reply: oneshot::Sender<ResponderStatus>,
    },
    Release {
        count: u32,
        reply: oneshot::Sender<u32>,
    },
}

/// Cloneable address of a running responder actor.
///
/// The actor stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct ResponderHandle {
    id: String,
    category: ResponderCategory,
    tx: mpsc::Sender<Command>,
}

impl ResponderHandle {
    /// Spawn `responder` on the current runtime.
    ///
    /// Every handled report's response is delivered to `sink` under the
    /// category name as responder id.
    pub fn spawn<R: Responder>(
        responder: R,
        sink: Arc<dyn ResponseSink>,
        config: &ResponderConfig,
    ) -> (Self, JoinHandle<()>) {
        let category = responder.category();
        let id = category.as_str().to_string();
        let (tx, rx) = mpsc::channel(config.mailbox_capacity.max(1));

        let task = tokio::spawn(run(responder, rx, sink, id.clone(), config.clone()));
        info!(responder = %id, "Responder started");

        (Self { id, category, tx }, task)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> ResponderCategory {
        self.category
    }

    /// Queue a report without waiting. Fails if the mailbox is full or closed.
    pub fn try_dispatch(&self, report: EmergencyReport) -> Result<(), TriageError> {
        self.tx
            .try_send(Command::Handle {
                report,
                reply: None,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => TriageError::MailboxFull(self.id.clone()),
                mpsc::error::TrySendError::Closed(_) => TriageError::MailboxClosed(self.id.clone()),
            })
    }

    /// Queue a report and wait for the responder's reply.
    ///
    /// The response is still delivered to the sink as well.
    pub async fn handle(&self, report: EmergencyReport) -> Result<ResponderReply, TriageError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Handle {
            report,
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| TriageError::NoReply(self.id.clone()))
    }

    pub async fn status(&self) -> Result<ResponderStatus, TriageError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Status { reply }).await?;
        rx.await.map_err(|_| TriageError::NoReply(self.id.clone()))
    }

    /// Return dispatched units to service; yields how many came back.
    pub async fn release(&self, count: u32) -> Result<u32, TriageError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Release { count, reply }).await?;
        rx.await.map_err(|_| TriageError::NoReply(self.id.clone()))
    }

    async fn send(&self, command: Command) -> Result<(), TriageError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| TriageError::MailboxClosed(self.id.clone()))
    }
}

async fn run<R: Responder>(
    mut responder: R,
    mut rx: mpsc::Receiver<Command>,
    sink: Arc<dyn ResponseSink>,
    id: String,
    config: ResponderConfig,
) {
    let mut monitor = config.monitor_interval.map(|period| {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    loop {
        let command = match monitor.as_mut() {
            Some(ticker) => tokio::select! {
                command = rx.recv() => command,
                _ = ticker.tick() => {
                    for alert in responder.status().alerts() {
                        warn!(responder = %id, "{}", alert);
                    }
                    continue;
                }
            },
            None => rx.recv().await,
        };

        let Some(command) = command else {
            break;
        };

        match command {
            Command::Handle { report, reply } => {
                debug!(responder = %id, report_id = report.id(), "Handling report");
                let result = responder.handle_report(&report);
                if let Err(e) = sink.deliver(&id, result.response.clone()).await {
                    warn!(responder = %id, report_id = report.id(), error = %e, "Response delivery failed");
                }
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }
            Command::Status { reply } => {
                let _ = reply.send(responder.status());
            }
            Command::Release { count, reply } => {
                let _ = reply.send(responder.release(count));
            }
        }
    }

    info!(responder = %id, "Responder stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_selector::Inventory;
    use knowledge_base::KnowledgeBase;
    use tokio::sync::Mutex;
    use triage_core::{async_trait, EmergencyResponse, EmergencyType, NoOpSink};

    use crate::{MedicalResponder, ShelterResponder};

    #[derive(Default)]
    struct CollectingSink {
        delivered: Mutex<Vec<(String, EmergencyResponse)>>,
    }

    #[async_trait]
    impl ResponseSink for CollectingSink {
        async fn deliver(
            &self,
            responder_id: &str,
            response: EmergencyResponse,
        ) -> Result<(), TriageError> {
            self.delivered
                .lock()
                .await
                .push((responder_id.to_string(), response));
            Ok(())
        }
    }

    fn medical() -> MedicalResponder {
        let inventory = Inventory::builtin().unwrap();
        MedicalResponder::new(
            inventory.hospitals,
            inventory.ambulances,
            Arc::new(KnowledgeBase::builtin().unwrap()),
        )
    }

    fn config() -> ResponderConfig {
        ResponderConfig::default().without_monitor()
    }

    #[tokio::test]
    async fn test_handle_replies_and_delivers() {
        let sink = Arc::new(CollectingSink::default());
        let (handle, _task) = ResponderHandle::spawn(medical(), sink.clone(), &config());

        let report = EmergencyReport::new("EM-1", EmergencyType::Medical, 8.0, "heart attack", 1);
        let reply = handle.handle(report).await.unwrap();
        assert_eq!(reply.outcome.committed(), 3);

        let delivered = sink.delivered.lock().await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, "medical");
        assert_eq!(delivered[0].1.report_id, "EM-1");
    }

    #[tokio::test]
    async fn test_reports_are_serialized() {
        let sink = Arc::new(NoOpSink);
        let (handle, _task) = ResponderHandle::spawn(medical(), sink, &config());

        for i in 0..4 {
            let report =
                EmergencyReport::new(format!("EM-{}", i), EmergencyType::Medical, 8.0, "injured", 1);
            handle.try_dispatch(report).unwrap();
        }

        let ResponderStatus::Medical(status) = handle.status().await.unwrap() else {
            panic!("expected medical status");
        };
        assert_eq!(status.ambulances_available, 3);
        assert_eq!(status.ambulances_dispatched, 12);

        assert_eq!(handle.release(2).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_full_mailbox_rejects() {
        // Current-thread runtime: the actor cannot drain until we yield.
        let sink = Arc::new(NoOpSink);
        let config = config().with_mailbox_capacity(1);
        let (handle, _task) = ResponderHandle::spawn(
            ShelterResponder::new(Inventory::builtin().unwrap().shelters),
            sink,
            &config,
        );

        let report = EmergencyReport::new("EM-1", EmergencyType::Flood, 7.0, "flood", 10);
        handle.try_dispatch(report.clone()).unwrap();
        assert!(matches!(
            handle.try_dispatch(report),
            Err(TriageError::MailboxFull(ref id)) if id == "shelter"
        ));
    }

    #[tokio::test]
    async fn test_closed_mailbox() {
        let sink = Arc::new(NoOpSink);
        let (handle, task) = ResponderHandle::spawn(medical(), sink, &config());
        task.abort();
        let _ = task.await;

        let report = EmergencyReport::new("EM-1", EmergencyType::Medical, 8.0, "injured", 1);
        assert!(matches!(
            handle.try_dispatch(report),
            Err(TriageError::MailboxClosed(_))
        ));
    }
}
