//! Serialized form of the fact table.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;
use triage_core::{EmergencyType, ResourceKind, SeverityBand};

/// Top-level document as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FactTable {
    pub base_severity: f64,
    pub fallback_type: EmergencyType,
    pub default_depot_resource: ResourceKind,
    pub types: Vec<TypeRow>,
    #[serde(default)]
    pub collaborations: Vec<(EmergencyType, EmergencyType)>,
    #[serde(default)]
    pub priorities: Vec<PriorityRow>,
    #[serde(default)]
    pub triage_coefficients: Vec<CoefficientRow>,
    #[serde(default)]
    pub optimal_resources: Vec<OptimalRow>,
    #[serde(default)]
    pub quantity_tiers: IndexMap<ResourceKind, QuantityTier>,
    pub response_time_factors: ResponseTimeFactors,
    #[serde(default)]
    pub capabilities: HashMap<String, Vec<String>>,
}

/// Per-type facts: classifier keywords plus `Requires` and `EscalatesTo`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TypeRow {
    #[serde(rename = "type")]
    pub emergency_type: EmergencyType,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub severity_modifiers: IndexMap<String, f64>,
    #[serde(default)]
    pub resources: Vec<ResourceKind>,
    #[serde(default)]
    pub escalates_to: Vec<EmergencyType>,
    /// Depot counter drawn for this type; the table default applies when absent.
    #[serde(default)]
    pub depot_resource: Option<ResourceKind>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PriorityRow {
    pub band: SeverityBand,
    pub resource: ResourceKind,
    pub priority: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CoefficientRow {
    #[serde(rename = "type")]
    pub emergency_type: EmergencyType,
    pub band: SeverityBand,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OptimalRow {
    #[serde(rename = "type")]
    pub emergency_type: EmergencyType,
    pub band: SeverityBand,
    pub resource: ResourceKind,
}

/// Quantity to request of one resource, by severity band.
///
/// `Low` shares the medium tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QuantityTier {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
}

impl QuantityTier {
    pub fn for_band(&self, band: SeverityBand) -> u32 {
        match band {
            SeverityBand::Critical => self.critical,
            SeverityBand::High => self.high,
            SeverityBand::Medium | SeverityBand::Low => self.medium,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResponseTimeFactors {
    pub default: f64,
    #[serde(default)]
    pub bands: HashMap<SeverityBand, f64>,
}
