//! Read-only knowledge base queried by the classifier, responders and optimizer.

use std::collections::{HashMap, HashSet};
use std::env;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info};
use triage_core::{EmergencyType, ResourceKind, SeverityBand};

use crate::error::KnowledgeError;
use crate::facts::{FactTable, QuantityTier, TypeRow};

/// Built-in fact table shipped with the crate.
const BUILTIN_FACTS: &str = include_str!("../assets/facts.json");

/// Coefficient used for `(type, band)` pairs absent from the triage table.
const DEFAULT_TRIAGE_COEFFICIENT: f64 = 1.0;

/// Env var naming a fact table that replaces the built-in one.
pub const FACTS_PATH_ENV: &str = "TRIAGE_FACTS_PATH";

/// Facts about one emergency type.
#[derive(Debug, Clone)]
pub struct TypeFacts {
    /// Lower-cased classifier keywords.
    pub keywords: Vec<String>,
    /// Lower-cased modifier keyword to severity points.
    pub severity_modifiers: IndexMap<String, f64>,
    /// `Requires(type)`, ordered and de-duplicated.
    pub resources: Vec<ResourceKind>,
    /// `EscalatesTo(type)`.
    pub escalates_to: Vec<EmergencyType>,
    pub depot_resource: Option<ResourceKind>,
}

/// Static fact table, loaded once and never mutated.
///
/// Every query is a lookup into data; adding a type or resource row means
/// editing the table, not this code.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    base_severity: f64,
    fallback_type: EmergencyType,
    default_depot_resource: ResourceKind,
    types: IndexMap<EmergencyType, TypeFacts>,
    collaborations: HashSet<(EmergencyType, EmergencyType)>,
    priorities: HashMap<(SeverityBand, ResourceKind), f64>,
    triage_coefficients: HashMap<(EmergencyType, SeverityBand), f64>,
    optimal_resources: HashMap<(EmergencyType, SeverityBand), ResourceKind>,
    quantity_tiers: HashMap<ResourceKind, QuantityTier>,
    default_response_factor: f64,
    response_factors: HashMap<SeverityBand, f64>,
    capabilities: HashMap<String, Vec<String>>,
}

impl KnowledgeBase {
    /// Load the fact table shipped with the crate.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_json(BUILTIN_FACTS)
    }

    /// Load and validate a fact table from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        let table: FactTable = serde_json::from_str(json)?;
        Self::from_table(table)
    }

    /// Load and validate a fact table from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loading fact table");
        Self::from_json(&json)
    }

    /// Load the table named by `TRIAGE_FACTS_PATH`, or the built-in one.
    pub fn from_env() -> Result<Self, KnowledgeError> {
        match env::var(FACTS_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_path(path.trim()),
            _ => Self::builtin(),
        }
    }

    fn from_table(table: FactTable) -> Result<Self, KnowledgeError> {
        check_finite("base_severity", table.base_severity)?;

        let mut types = IndexMap::new();
        for row in table.types {
            let name = row.emergency_type.clone();
            if types.contains_key(&name) {
                return Err(KnowledgeError::DuplicateType(name.to_string()));
            }
            types.insert(name, type_facts(row)?);
        }

        if !types.contains_key(&table.fallback_type) {
            return Err(KnowledgeError::UnknownType {
                context: "fallback_type",
                name: table.fallback_type.to_string(),
            });
        }

        let mut collaborations = HashSet::new();
        for (a, b) in table.collaborations {
            collaborations.insert((a.clone(), b.clone()));
            collaborations.insert((b, a));
        }

        let mut priorities = HashMap::new();
        for row in table.priorities {
            check_finite("priority", row.priority)?;
            priorities.insert((row.band, row.resource), row.priority);
        }

        let mut triage_coefficients = HashMap::new();
        for row in table.triage_coefficients {
            check_finite("triage coefficient", row.coefficient)?;
            if row.coefficient < 0.0 {
                return Err(KnowledgeError::Invalid(format!(
                    "negative triage coefficient for {} {}",
                    row.emergency_type, row.band
                )));
            }
            triage_coefficients.insert((row.emergency_type, row.band), row.coefficient);
        }

        let optimal_resources = table
            .optimal_resources
            .into_iter()
            .map(|row| ((row.emergency_type, row.band), row.resource))
            .collect();

        check_finite("default response time factor", table.response_time_factors.default)?;
        for factor in table.response_time_factors.bands.values() {
            check_finite("response time factor", *factor)?;
        }

        let kb = Self {
            base_severity: table.base_severity,
            fallback_type: table.fallback_type,
            default_depot_resource: table.default_depot_resource,
            types,
            collaborations,
            priorities,
            triage_coefficients,
            optimal_resources,
            quantity_tiers: table.quantity_tiers.into_iter().collect(),
            default_response_factor: table.response_time_factors.default,
            response_factors: table.response_time_factors.bands,
            capabilities: table.capabilities,
        };

        debug!(
            types = kb.types.len(),
            collaborations = kb.collaborations.len() / 2,
            "Fact table loaded"
        );
        Ok(kb)
    }

    /// Severity before modifiers.
    pub fn base_severity(&self) -> f64 {
        self.base_severity
    }

    /// Type assigned when nothing matches.
    pub fn fallback_type(&self) -> &EmergencyType {
        &self.fallback_type
    }

    /// Declared types with their facts, in declaration order.
    pub fn types(&self) -> impl Iterator<Item = (&EmergencyType, &TypeFacts)> {
        self.types.iter()
    }

    pub fn type_facts(&self, emergency_type: &EmergencyType) -> Option<&TypeFacts> {
        self.types.get(emergency_type)
    }

    /// `Requires(type)`. Undeclared types require nothing.
    pub fn required_resources(&self, emergency_type: &EmergencyType) -> Vec<ResourceKind> {
        self.types
            .get(emergency_type)
            .map(|facts| facts.resources.clone())
            .unwrap_or_default()
    }

    /// `EscalatesTo(type)`. Undeclared types escalate to nothing.
    pub fn escalation_risk(&self, emergency_type: &EmergencyType) -> Vec<EmergencyType> {
        self.types
            .get(emergency_type)
            .map(|facts| facts.escalates_to.clone())
            .unwrap_or_default()
    }

    /// `CollaboratesWith(a, b)`, symmetric. Undeclared pairs do not collaborate.
    pub fn should_collaborate(&self, a: &EmergencyType, b: &EmergencyType) -> bool {
        self.collaborations.contains(&(a.clone(), b.clone()))
    }

    /// `PriorityFor(band, resource)`, 0 when absent.
    pub fn priority_for(&self, band: SeverityBand, resource: &ResourceKind) -> f64 {
        self.priorities
            .get(&(band, resource.clone()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Triage coefficient for a `(type, band)` pair, 1 when absent.
    pub fn triage_coefficient(&self, emergency_type: &EmergencyType, band: SeverityBand) -> f64 {
        self.triage_coefficients
            .get(&(emergency_type.clone(), band))
            .copied()
            .unwrap_or(DEFAULT_TRIAGE_COEFFICIENT)
    }

    /// `TriageScore(type, band, count) = count x coefficient(type, band)`.
    pub fn triage_score(
        &self,
        emergency_type: &EmergencyType,
        band: SeverityBand,
        affected_count: u32,
    ) -> f64 {
        f64::from(affected_count) * self.triage_coefficient(emergency_type, band)
    }

    /// Best single resource for a `(type, band)` pair, if the table names one.
    pub fn optimal_resource(
        &self,
        emergency_type: &EmergencyType,
        band: SeverityBand,
    ) -> Option<&ResourceKind> {
        self.optimal_resources.get(&(emergency_type.clone(), band))
    }

    /// Quantity to request of `resource` for a report in `band`.
    pub fn quantity_for(&self, resource: &ResourceKind, band: SeverityBand) -> Option<u32> {
        self.quantity_tiers.get(resource).map(|tier| tier.for_band(band))
    }

    /// Depot counter a responder should draw for this type.
    pub fn depot_resource(&self, emergency_type: &EmergencyType) -> &ResourceKind {
        self.types
            .get(emergency_type)
            .and_then(|facts| facts.depot_resource.as_ref())
            .unwrap_or(&self.default_depot_resource)
    }

    /// Estimated response time in minutes for a distance in km.
    pub fn estimate_response_time(&self, distance_km: f64, band: SeverityBand) -> f64 {
        let factor = self
            .response_factors
            .get(&band)
            .copied()
            .unwrap_or(self.default_response_factor);
        distance_km * factor
    }

    /// Capabilities declared for a facility.
    pub fn capabilities(&self, facility: &str) -> &[String] {
        self.capabilities
            .get(facility)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_capability(&self, facility: &str, capability: &str) -> bool {
        self.capabilities(facility).iter().any(|c| c == capability)
    }

    /// Whether a hospital can take a given kind of emergency.
    ///
    /// Medical needs a trauma center, fire needs a burn unit, anything else
    /// needs at least one declared capability.
    pub fn hospital_suitable(&self, hospital: &str, emergency_type: &EmergencyType) -> bool {
        match emergency_type {
            EmergencyType::Medical => self.has_capability(hospital, "trauma-center"),
            EmergencyType::Fire => self.has_capability(hospital, "burn-unit"),
            _ => !self.capabilities(hospital).is_empty(),
        }
    }
}

fn type_facts(row: TypeRow) -> Result<TypeFacts, KnowledgeError> {
    let name = row.emergency_type.to_string();

    let mut keywords = Vec::with_capacity(row.keywords.len());
    for keyword in row.keywords {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Err(KnowledgeError::Invalid(format!("empty keyword for type {}", name)));
        }
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    let mut severity_modifiers = IndexMap::new();
    for (keyword, points) in row.severity_modifiers {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Err(KnowledgeError::Invalid(format!(
                "empty severity modifier for type {}",
                name
            )));
        }
        check_finite("severity modifier", points)?;
        severity_modifiers.insert(keyword, points);
    }

    let mut resources: Vec<ResourceKind> = Vec::with_capacity(row.resources.len());
    for resource in row.resources {
        if !resources.contains(&resource) {
            resources.push(resource);
        }
    }

    Ok(TypeFacts {
        keywords,
        severity_modifiers,
        resources,
        escalates_to: row.escalates_to,
        depot_resource: row.depot_resource,
    })
}

fn check_finite(what: &str, value: f64) -> Result<(), KnowledgeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(KnowledgeError::Invalid(format!("{} must be finite", what)))
    }
}
