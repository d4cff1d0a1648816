//! Resource allocation responder: depot stock by emergency type.

use std::sync::Arc;

use facility_selector::{AllocationRequest, FacilityStore};
use knowledge_base::KnowledgeBase;
use tracing::{info, warn};
use triage_core::{
    EmergencyReport, EmergencyResponse, ResourceKind, ResponderCategory, ResponderReply,
    SelectionOutcome,
};

use crate::status::{DepotStatus, ResourceStatus, ResponderStatus, StockShortage, SHORTAGE_THRESHOLD};
use crate::trait_def::Responder;

const STATUS_ALLOCATED: &str = "Resources allocated";

/// Resources whose total stock is watched for critical shortage.
const MONITORED: [ResourceKind; 2] = [ResourceKind::EmergencyTeams, ResourceKind::MedicalSupplies];

/// Owns the supply depots.
pub struct ResourceResponder {
    depots: FacilityStore,
    knowledge: Arc<KnowledgeBase>,
}

impl ResourceResponder {
    pub fn new(depots: FacilityStore, knowledge: Arc<KnowledgeBase>) -> Self {
        Self { depots, knowledge }
    }

    pub fn depots(&self) -> &FacilityStore {
        &self.depots
    }

    fn critical_shortages(&self) -> Vec<StockShortage> {
        MONITORED
            .iter()
            .map(|resource| StockShortage {
                resource: resource.clone(),
                remaining: self.depots.total_stock(resource),
            })
            .filter(|shortage| shortage.remaining < SHORTAGE_THRESHOLD)
            .collect()
    }
}

impl Responder for ResourceResponder {
    fn category(&self) -> ResponderCategory {
        ResponderCategory::ResourceAllocation
    }

    fn handle_report(&mut self, report: &EmergencyReport) -> ResponderReply {
        let resource = self.knowledge.depot_resource(report.emergency_type()).clone();
        let quantity = self
            .knowledge
            .quantity_for(&resource, report.band())
            .unwrap_or(1);

        let outcome = self
            .depots
            .allocate(&AllocationRequest::stock(resource.clone(), quantity));

        let (teams, details) = match &outcome {
            SelectionOutcome::Allocated {
                quantity,
                facility,
                eta_minutes,
                ..
            } => {
                info!(
                    report_id = report.id(),
                    resource = %resource,
                    quantity,
                    depot = %facility,
                    "Resources allocated"
                );
                let teams = if resource == ResourceKind::EmergencyTeams {
                    *quantity
                } else {
                    0
                };
                (
                    teams,
                    format!(
                        "Allocated {} {} from {} | ETA: {}min",
                        quantity, resource, facility, eta_minutes
                    ),
                )
            }
            SelectionOutcome::Shortage {
                requested, facility, ..
            } => {
                warn!(
                    report_id = report.id(),
                    resource = %resource,
                    requested,
                    depot = %facility,
                    "Insufficient stock"
                );
                (
                    0,
                    format!("Shortage of {} at {}: {} requested", resource, facility, requested),
                )
            }
            SelectionOutcome::NoSuitableFacility { .. } => {
                warn!(report_id = report.id(), "No depot available");
                (0, "No depots connected".to_string())
            }
        };

        for shortage in self.critical_shortages() {
            warn!(
                resource = %shortage.resource,
                remaining = shortage.remaining,
                "Critical shortage"
            );
        }

        ResponderReply {
            outcome,
            response: EmergencyResponse::new(report.id(), STATUS_ALLOCATED, teams, details),
        }
    }

    fn status(&self) -> ResponderStatus {
        ResponderStatus::ResourceAllocation(ResourceStatus {
            depots: self
                .depots
                .facilities()
                .iter()
                .map(|d| DepotStatus {
                    name: d.name().to_string(),
                    distance: d.distance(),
                    stock: d.counters().map(|(k, v)| (k.clone(), v)).collect(),
                })
                .collect(),
            critical_shortages: self.critical_shortages(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_selector::{Facility, FacilityKind, Inventory};
    use triage_core::EmergencyType;

    fn responder() -> ResourceResponder {
        ResourceResponder::new(
            Inventory::builtin().unwrap().depots,
            Arc::new(KnowledgeBase::builtin().unwrap()),
        )
    }

    fn report(emergency_type: EmergencyType, severity: f64) -> EmergencyReport {
        EmergencyReport::new("EM-7", emergency_type, severity, "test", 10)
    }

    #[test]
    fn test_fire_draws_equipment_from_nearest_depot() {
        let mut depots = responder();
        let reply = depots.handle_report(&report(EmergencyType::Fire, 8.0));
        assert_eq!(
            reply.outcome,
            SelectionOutcome::Allocated {
                resource: ResourceKind::FireEquipment,
                quantity: 5,
                facility: "Central Depot".to_string(),
                eta_minutes: 15,
            }
        );
        assert_eq!(reply.response.teams_assigned, 0);
        assert_eq!(
            reply.response.details,
            "Allocated 5 fire_equipment from Central Depot | ETA: 15min"
        );
        let central = depots.depots().get("Central Depot").unwrap();
        assert_eq!(central.counter(&ResourceKind::FireEquipment), 25);
    }

    #[test]
    fn test_chemical_draws_emergency_teams() {
        let mut depots = responder();
        let reply = depots.handle_report(&report(EmergencyType::Chemical, 7.0));
        // HIGH band requests 3 teams, which are counted as assigned.
        assert_eq!(reply.outcome.committed(), 3);
        assert_eq!(reply.response.teams_assigned, 3);
    }

    #[test]
    fn test_shortage_leaves_stock_untouched() {
        let mut depots = ResourceResponder::new(
            FacilityStore::new(
                FacilityKind::Depot,
                vec![Facility::new("Central Depot", 1.5).with_counter(ResourceKind::RescueBoats, 1)],
            )
            .unwrap(),
            Arc::new(KnowledgeBase::builtin().unwrap()),
        );
        let reply = depots.handle_report(&report(EmergencyType::Flood, 6.0));
        assert!(matches!(reply.outcome, SelectionOutcome::Shortage { requested: 2, .. }));
        assert_eq!(reply.response.teams_assigned, 0);
        assert_eq!(
            depots.depots().get("Central Depot").unwrap().counter(&ResourceKind::RescueBoats),
            1
        );
    }

    #[test]
    fn test_critical_shortage_flagged() {
        let mut depots = responder();
        assert!(depots.critical_shortages().is_empty());
        // Central Depot holds 8 teams; HIGH general reports take 3 each.
        for _ in 0..2 {
            depots.handle_report(&report(EmergencyType::General, 6.0));
        }
        // 17 - 6 = 11 teams remain.
        assert!(depots.critical_shortages().is_empty());

        let mut drained = ResourceResponder::new(
            FacilityStore::new(
                FacilityKind::Depot,
                vec![Facility::new("Solo Depot", 1.0)
                    .with_counter(ResourceKind::EmergencyTeams, 9)
                    .with_counter(ResourceKind::MedicalSupplies, 100)],
            )
            .unwrap(),
            Arc::new(KnowledgeBase::builtin().unwrap()),
        );
        let ResponderStatus::ResourceAllocation(status) = drained.status() else {
            panic!("expected resource status");
        };
        assert_eq!(
            status.critical_shortages,
            vec![StockShortage {
                resource: ResourceKind::EmergencyTeams,
                remaining: 9
            }]
        );
        drained.handle_report(&report(EmergencyType::General, 5.0));
        assert_eq!(drained.critical_shortages()[0].remaining, 8);
    }
}
