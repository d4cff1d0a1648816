//! Resource vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A kind of resource an emergency can require or a facility can stock.
///
/// Unknown names are carried as [`ResourceKind::Other`] so the fact table
/// and inventories can introduce new rows without code changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    Ambulance,
    MedicalSupplies,
    TraumaTeam,
    FireEquipment,
    EmergencyTeams,
    WaterSupply,
    RescueBoats,
    Shelters,
    HazmatTeam,
    Decontamination,
    IcuBeds,
    ShelterSpace,
    Other(String),
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ambulance => "ambulance",
            Self::MedicalSupplies => "medical_supplies",
            Self::TraumaTeam => "trauma_team",
            Self::FireEquipment => "fire_equipment",
            Self::EmergencyTeams => "emergency_teams",
            Self::WaterSupply => "water_supply",
            Self::RescueBoats => "rescue_boats",
            Self::Shelters => "shelters",
            Self::HazmatTeam => "hazmat_team",
            Self::Decontamination => "decontamination",
            Self::IcuBeds => "icu_beds",
            Self::ShelterSpace => "shelter_space",
            Self::Other(name) => name,
        }
    }

    /// Human-readable label, e.g. `medical_supplies` -> `Medical Supplies`.
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<&str> for ResourceKind {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "ambulance" => Self::Ambulance,
            "medical_supplies" => Self::MedicalSupplies,
            "trauma_team" => Self::TraumaTeam,
            "fire_equipment" => Self::FireEquipment,
            "emergency_teams" => Self::EmergencyTeams,
            "water_supply" => Self::WaterSupply,
            "rescue_boats" => Self::RescueBoats,
            "shelters" => Self::Shelters,
            "hazmat_team" => Self::HazmatTeam,
            "decontamination" => Self::Decontamination,
            "icu_beds" => Self::IcuBeds,
            "shelter_space" => Self::ShelterSpace,
            _ => Self::Other(normalized),
        }
    }
}

impl From<String> for ResourceKind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ResourceKind> for String {
    fn from(value: ResourceKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_names() {
        assert_eq!(ResourceKind::from("hazmat_team"), ResourceKind::HazmatTeam);
        assert_eq!(ResourceKind::from("Rescue_Boats"), ResourceKind::RescueBoats);
        assert_eq!(
            ResourceKind::from("helicopter"),
            ResourceKind::Other("helicopter".to_string())
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(ResourceKind::MedicalSupplies.label(), "Medical Supplies");
        assert_eq!(ResourceKind::Ambulance.label(), "Ambulance");
    }
}
