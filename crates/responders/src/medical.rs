//! Medical responder: ambulance dispatch to the nearest hospital.

use std::sync::Arc;

use facility_selector::{AllocationRequest, FacilityStore, ResourcePool};
use knowledge_base::KnowledgeBase;
use tracing::{info, warn};
use triage_core::{
    EmergencyReport, EmergencyResponse, ResourceKind, ResponderCategory, ResponderReply,
    SelectionOutcome,
};

use crate::status::{HospitalStatus, MedicalStatus, ResponderStatus};
use crate::trait_def::Responder;

const STATUS_DISPATCHED: &str = "Medical teams dispatched";

/// Owns the hospital network and the ambulance pool.
pub struct MedicalResponder {
    hospitals: FacilityStore,
    ambulances: ResourcePool,
    knowledge: Arc<KnowledgeBase>,
}

impl MedicalResponder {
    pub fn new(hospitals: FacilityStore, ambulances: ResourcePool, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            hospitals,
            ambulances,
            knowledge,
        }
    }

    pub fn ambulances(&self) -> ResourcePool {
        self.ambulances
    }

    pub fn hospitals(&self) -> &FacilityStore {
        &self.hospitals
    }

    /// Reserve ICU beds at the chosen hospital when the band calls for it.
    fn reserve_icu(&mut self, hospital: &str, report: &EmergencyReport) -> Option<SelectionOutcome> {
        let beds = self
            .knowledge
            .quantity_for(&ResourceKind::IcuBeds, report.band())
            .unwrap_or(0);
        if beds == 0 {
            return None;
        }
        let outcome = self
            .hospitals
            .allocate_at(hospital, &AllocationRequest::stock(ResourceKind::IcuBeds, beds));
        if !outcome.is_allocated() {
            warn!(report_id = report.id(), hospital, "No ICU bed available");
        }
        Some(outcome)
    }
}

impl Responder for MedicalResponder {
    fn category(&self) -> ResponderCategory {
        ResponderCategory::Medical
    }

    fn handle_report(&mut self, report: &EmergencyReport) -> ResponderReply {
        let band = report.band();
        let wanted = self
            .knowledge
            .quantity_for(&ResourceKind::Ambulance, band)
            .unwrap_or(1);
        let request = AllocationRequest::stock(ResourceKind::Ambulance, wanted);

        let Some(hospital) = self.hospitals.select(&request) else {
            warn!(report_id = report.id(), "No hospital available");
            return ResponderReply {
                outcome: SelectionOutcome::NoSuitableFacility { requested: wanted },
                response: EmergencyResponse::new(
                    report.id(),
                    "No hospital available",
                    0,
                    "No hospitals connected",
                ),
            };
        };

        let hospital_name = hospital.name().to_string();
        let eta_minutes = hospital.eta_minutes(self.hospitals.kind());
        let available_beds = hospital.available_space();
        if !self
            .knowledge
            .hospital_suitable(&hospital_name, report.emergency_type())
        {
            warn!(
                report_id = report.id(),
                hospital = %hospital_name,
                emergency_type = %report.emergency_type(),
                "Nearest hospital lacks the matching capability"
            );
        }

        let sent = self.ambulances.dispatch(wanted);
        let outcome = if sent > 0 || wanted == 0 {
            SelectionOutcome::Allocated {
                resource: ResourceKind::Ambulance,
                quantity: sent,
                facility: hospital_name.clone(),
                eta_minutes,
            }
        } else {
            SelectionOutcome::Shortage {
                requested_resource: ResourceKind::Ambulance,
                requested: wanted,
                facility: hospital_name.clone(),
                eta_minutes,
            }
        };

        let mut details = format!(
            "{} ambulances to {} | ETA: {}min",
            sent, hospital_name, eta_minutes
        );
        // ICU beds are only held for patients an ambulance is bringing in.
        if sent > 0 {
            match self.reserve_icu(&hospital_name, report) {
                Some(icu) if icu.is_allocated() => details.push_str(" | ICU bed reserved"),
                Some(_) => details.push_str(" | no ICU bed available"),
                None => {}
            }
        }

        info!(
            report_id = report.id(),
            hospital = %hospital_name,
            available_beds,
            ambulances = sent,
            eta_minutes,
            "Medical response dispatched"
        );

        ResponderReply {
            outcome,
            response: EmergencyResponse::new(report.id(), STATUS_DISPATCHED, sent, details),
        }
    }

    fn status(&self) -> ResponderStatus {
        ResponderStatus::Medical(MedicalStatus {
            ambulances_available: self.ambulances.available(),
            ambulances_dispatched: self.ambulances.dispatched(),
            hospitals: self
                .hospitals
                .facilities()
                .iter()
                .map(|h| HospitalStatus {
                    name: h.name().to_string(),
                    distance: h.distance(),
                    available_beds: h.available_space(),
                    icu_available: h.counter(&ResourceKind::IcuBeds),
                })
                .collect(),
        })
    }

    fn release(&mut self, count: u32) -> u32 {
        let returned = self.ambulances.release(count);
        if returned > 0 {
            info!(returned, available = self.ambulances.available(), "Ambulances returned to service");
        }
        returned
    }
}
