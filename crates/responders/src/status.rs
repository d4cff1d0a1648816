//! Structured inventory status reported by each responder.

use serde::{Deserialize, Serialize};
use triage_core::{ResourceKind, ResponderCategory};

/// Total depot stock below which a resource is in critical shortage.
pub const SHORTAGE_THRESHOLD: u32 = 10;
/// Overall shelter utilization (percent) that raises an alert.
pub const UTILIZATION_ALERT_PERCENT: f64 = 80.0;
/// Per-shelter occupancy (percent) reported as full.
pub const SHELTER_FULL_PERCENT: f64 = 95.0;

/// Status of one responder's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ResponderStatus {
    Medical(MedicalStatus),
    ResourceAllocation(ResourceStatus),
    Shelter(ShelterStatus),
}

impl ResponderStatus {
    pub fn category(&self) -> ResponderCategory {
        match self {
            Self::Medical(_) => ResponderCategory::Medical,
            Self::ResourceAllocation(_) => ResponderCategory::ResourceAllocation,
            Self::Shelter(_) => ResponderCategory::Shelter,
        }
    }

    /// Conditions worth an operator's attention.
    pub fn alerts(&self) -> Vec<String> {
        match self {
            Self::Medical(status) if status.ambulances_available == 0 => {
                vec!["no ambulances available".to_string()]
            }
            Self::Medical(_) => Vec::new(),
            Self::ResourceAllocation(status) => status
                .critical_shortages
                .iter()
                .map(|shortage| {
                    format!(
                        "critical shortage: {} ({} units remaining)",
                        shortage.resource, shortage.remaining
                    )
                })
                .collect(),
            Self::Shelter(status) => {
                let mut alerts = Vec::new();
                if status.utilization_alert {
                    alerts.push(format!(
                        "shelter utilization at {:.1}%",
                        status.utilization_percent
                    ));
                }
                for shelter in status.shelters.iter().filter(|s| s.occupancy_percent > SHELTER_FULL_PERCENT) {
                    alerts.push(format!("{} is {:.1}% full", shelter.name, shelter.occupancy_percent));
                }
                alerts
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalStatus {
    pub ambulances_available: u32,
    pub ambulances_dispatched: u32,
    pub hospitals: Vec<HospitalStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalStatus {
    pub name: String,
    pub distance: f64,
    pub available_beds: u32,
    pub icu_available: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStatus {
    pub depots: Vec<DepotStatus>,
    /// Monitored resources whose total stock is below [`SHORTAGE_THRESHOLD`].
    pub critical_shortages: Vec<StockShortage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotStatus {
    pub name: String,
    pub distance: f64,
    pub stock: Vec<(ResourceKind, u32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockShortage {
    pub resource: ResourceKind,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterStatus {
    pub shelters: Vec<ShelterOccupancy>,
    pub total_capacity: u32,
    pub total_occupied: u32,
    pub utilization_percent: f64,
    /// Set above [`UTILIZATION_ALERT_PERCENT`].
    pub utilization_alert: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterOccupancy {
    pub name: String,
    pub address: Option<String>,
    pub capacity: u32,
    pub current_load: u32,
    pub available: u32,
    pub occupancy_percent: f64,
    pub level: OccupancyLevel,
    pub amenities: Vec<String>,
    pub pets_allowed: bool,
}

/// Traffic-light occupancy band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyLevel {
    Green,
    Amber,
    Red,
}

impl OccupancyLevel {
    /// Green below 70%, amber below 90%, red otherwise.
    pub fn from_percent(percent: f64) -> Self {
        if percent < 70.0 {
            Self::Green
        } else if percent < 90.0 {
            Self::Amber
        } else {
            Self::Red
        }
    }
}
