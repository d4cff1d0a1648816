//! Wiring: responders, dispatcher and coordinator started together.

use std::sync::Arc;

use facility_selector::Inventory;
use knowledge_base::KnowledgeBase;
use responders::{
    MedicalResponder, ResourceResponder, ResponderConfig, ResponderHandle, ShelterResponder,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use triage_core::ResponseSink;

use crate::actor::CoordinatorHandle;
use crate::config::DispatchConfig;
use crate::coordinator::DispatchCoordinator;
use crate::dispatcher::ActorDispatcher;
use crate::error::DispatchError;

/// A running coordinator with its three responders.
pub struct TriageSystem {
    coordinator: CoordinatorHandle,
    responders: ActorDispatcher,
    tasks: Vec<JoinHandle<()>>,
}

impl TriageSystem {
    /// Start every actor on the current runtime.
    pub fn start(
        knowledge: Arc<KnowledgeBase>,
        inventory: Inventory,
        dispatch: &DispatchConfig,
        responder: &ResponderConfig,
    ) -> Self {
        let (coordinator, mailbox) = CoordinatorHandle::channel(dispatch.mailbox_capacity);
        let sink: Arc<dyn ResponseSink> = Arc::new(coordinator.clone());

        let (medical, medical_task) = ResponderHandle::spawn(
            MedicalResponder::new(inventory.hospitals, inventory.ambulances, knowledge.clone()),
            sink.clone(),
            responder,
        );
        let (resources, resources_task) = ResponderHandle::spawn(
            ResourceResponder::new(inventory.depots, knowledge.clone()),
            sink.clone(),
            responder,
        );
        let (shelter, shelter_task) =
            ResponderHandle::spawn(ShelterResponder::new(inventory.shelters), sink, responder);

        let responders = ActorDispatcher::new()
            .with_responder(medical)
            .with_responder(resources)
            .with_responder(shelter);

        let coordinator_task = mailbox.spawn(
            DispatchCoordinator::new(knowledge, responders.clone(), dispatch),
            dispatch.stale_sweep_interval,
        );
        info!("Triage system started");

        Self {
            coordinator,
            responders,
            tasks: vec![coordinator_task, medical_task, resources_task, shelter_task],
        }
    }

    /// Load the fact table, inventory and configs from the environment and start.
    pub fn from_env() -> Result<Self, DispatchError> {
        let knowledge = Arc::new(KnowledgeBase::from_env()?);
        let inventory = Inventory::from_env()?;
        let dispatch = DispatchConfig::from_env()?;
        let responder = ResponderConfig::from_env()?;
        Ok(Self::start(knowledge, inventory, &dispatch, &responder))
    }

    pub fn coordinator(&self) -> &CoordinatorHandle {
        &self.coordinator
    }

    /// Direct access to the responder actors, e.g. to return ambulances.
    pub fn responders(&self) -> &ActorDispatcher {
        &self.responders
    }

    /// Stop the coordinator, then wait for every actor to finish.
    ///
    /// Responders stop once the coordinator has dropped its handles and
    /// this system drops its own.
    pub async fn shutdown(self) -> Result<(), DispatchError> {
        self.coordinator.shutdown().await?;
        drop(self.responders);
        drop(self.coordinator);
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Actor task ended abnormally");
            }
        }
        info!("Triage system stopped");
        Ok(())
    }
}
