//! Shelter responder: best-fit placement of affected people.

use facility_selector::{AllocationRequest, FacilityStore};
use tracing::{info, warn};
use triage_core::{EmergencyReport, EmergencyResponse, ResponderCategory, ResponderReply, SelectionOutcome};

use crate::status::{
    OccupancyLevel, ResponderStatus, ShelterOccupancy, ShelterStatus, UTILIZATION_ALERT_PERCENT,
};
use crate::trait_def::Responder;

const STATUS_ASSIGNED: &str = "Shelter assigned";

/// Amenities listed in an assignment's details.
const LISTED_AMENITIES: usize = 3;

/// Owns the shelter network.
pub struct ShelterResponder {
    shelters: FacilityStore,
}

impl ShelterResponder {
    pub fn new(shelters: FacilityStore) -> Self {
        Self { shelters }
    }

    pub fn shelters(&self) -> &FacilityStore {
        &self.shelters
    }
}

impl Responder for ShelterResponder {
    fn category(&self) -> ResponderCategory {
        ResponderCategory::Shelter
    }

    fn handle_report(&mut self, report: &EmergencyReport) -> ResponderReply {
        let people = report.affected_count();
        let outcome = self.shelters.allocate(&AllocationRequest::space(people));

        let details = match &outcome {
            SelectionOutcome::Allocated { facility, .. } => {
                let shelter = self.shelters.get(facility);
                let address = shelter.and_then(|s| s.address()).unwrap_or("address unknown");
                let amenities = shelter
                    .map(|s| s.amenities().iter().take(LISTED_AMENITIES).cloned().collect::<Vec<_>>())
                    .unwrap_or_default();
                info!(
                    report_id = report.id(),
                    shelter = %facility,
                    people,
                    amenities = ?amenities,
                    "Shelter assigned"
                );
                let mut details = format!("{} assigned | {} spaces | {}", facility, people, address);
                if !amenities.is_empty() {
                    details.push_str(&format!(" | {}", amenities.join(", ")));
                }
                details
            }
            // Overflow still answers as an assignment and counts every
            // affected person as teams assigned; only the details differ.
            _ => {
                warn!(report_id = report.id(), people, "No shelter with enough space");
                "All shelters at capacity - activating overflow protocol".to_string()
            }
        };

        ResponderReply {
            outcome,
            response: EmergencyResponse::new(report.id(), STATUS_ASSIGNED, people, details),
        }
    }

    fn status(&self) -> ResponderStatus {
        let utilization_percent = self.shelters.utilization_percent();
        ResponderStatus::Shelter(ShelterStatus {
            shelters: self
                .shelters
                .facilities()
                .iter()
                .map(|s| ShelterOccupancy {
                    name: s.name().to_string(),
                    address: s.address().map(str::to_string),
                    capacity: s.capacity(),
                    current_load: s.current_load(),
                    available: s.available_space(),
                    occupancy_percent: s.occupancy_percent(),
                    level: OccupancyLevel::from_percent(s.occupancy_percent()),
                    amenities: s.amenities().to_vec(),
                    pets_allowed: s.pets_allowed(),
                })
                .collect(),
            total_capacity: self.shelters.total_capacity(),
            total_occupied: self.shelters.total_load(),
            utilization_percent,
            utilization_alert: utilization_percent > UTILIZATION_ALERT_PERCENT,
        })
    }
}
