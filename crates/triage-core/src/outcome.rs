//! Outcomes of a responder's allocation attempt.

use serde::{Deserialize, Serialize};

use crate::resource::ResourceKind;
use crate::response::EmergencyResponse;

/// What happened when a responder tried to allocate for a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// The facility's inventory was mutated.
    Allocated {
        resource: ResourceKind,
        quantity: u32,
        facility: String,
        eta_minutes: u32,
    },

    /// The selected facility could not cover the request; nothing was mutated.
    ///
    /// The ETA is still reported since it is informational for the requester.
    Shortage {
        requested_resource: ResourceKind,
        requested: u32,
        facility: String,
        eta_minutes: u32,
    },

    /// No facility passed the capacity filter (overflow).
    NoSuitableFacility { requested: u32 },
}

impl SelectionOutcome {
    pub fn is_allocated(&self) -> bool {
        matches!(self, Self::Allocated { .. })
    }

    /// Name of the facility involved, if one was selected.
    pub fn facility(&self) -> Option<&str> {
        match self {
            Self::Allocated { facility, .. } | Self::Shortage { facility, .. } => Some(facility),
            Self::NoSuitableFacility { .. } => None,
        }
    }

    pub fn eta_minutes(&self) -> Option<u32> {
        match self {
            Self::Allocated { eta_minutes, .. } | Self::Shortage { eta_minutes, .. } => {
                Some(*eta_minutes)
            }
            Self::NoSuitableFacility { .. } => None,
        }
    }

    /// Quantity actually committed (zero unless allocated).
    pub fn committed(&self) -> u32 {
        match self {
            Self::Allocated { quantity, .. } => *quantity,
            _ => 0,
        }
    }
}

/// A responder's answer to one report: the allocation outcome plus the
/// response message destined for the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponderReply {
    pub outcome: SelectionOutcome,
    pub response: EmergencyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let allocated = SelectionOutcome::Allocated {
            resource: ResourceKind::Ambulance,
            quantity: 3,
            facility: "Emergency Care Unit".to_string(),
            eta_minutes: 5,
        };
        assert!(allocated.is_allocated());
        assert_eq!(allocated.facility(), Some("Emergency Care Unit"));
        assert_eq!(allocated.committed(), 3);

        let overflow = SelectionOutcome::NoSuitableFacility { requested: 900 };
        assert_eq!(overflow.facility(), None);
        assert_eq!(overflow.eta_minutes(), None);
        assert_eq!(overflow.committed(), 0);
    }

    #[test]
    fn test_outcome_serde_tag() {
        let shortage = SelectionOutcome::Shortage {
            requested_resource: ResourceKind::RescueBoats,
            requested: 2,
            facility: "Central Depot".to_string(),
            eta_minutes: 15,
        };
        let json = serde_json::to_value(&shortage).unwrap();
        assert_eq!(json["outcome"], "shortage");
        assert_eq!(json["requested_resource"], "rescue_boats");
    }
}
