//! Fixed mapping from a classification to responder categories.

use triage_core::{ClassificationResult, EmergencyReport, EmergencyType, ResourceKind, ResponderCategory};

use crate::config::DispatchConfig;

const MEDICAL_RESOURCES: [ResourceKind; 2] = [ResourceKind::Ambulance, ResourceKind::MedicalSupplies];
const LOGISTICS_RESOURCES: [ResourceKind; 3] = [
    ResourceKind::FireEquipment,
    ResourceKind::HazmatTeam,
    ResourceKind::RescueBoats,
];

/// Thresholds that decide shelter involvement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingRules {
    pub shelter_severity_threshold: f64,
    pub shelter_affected_threshold: u32,
}

impl Default for RoutingRules {
    fn default() -> Self {
        Self::from(&DispatchConfig::default())
    }
}

impl From<&DispatchConfig> for RoutingRules {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            shelter_severity_threshold: config.shelter_severity_threshold,
            shelter_affected_threshold: config.shelter_affected_threshold,
        }
    }
}

impl RoutingRules {
    /// Categories a classified report should go to, in dispatch order.
    ///
    /// - Medical: ambulance or medical supplies required, or a medical type.
    /// - ResourceAllocation: fire equipment, hazmat team or rescue boats required.
    /// - Shelter: any escalation risk, severity above threshold, or more
    ///   people affected than the threshold.
    pub fn route(
        &self,
        report: &EmergencyReport,
        classification: &ClassificationResult,
    ) -> Vec<ResponderCategory> {
        let mut targets = Vec::with_capacity(3);

        if classification.requires_any(&MEDICAL_RESOURCES)
            || classification.inferred_type == EmergencyType::Medical
        {
            targets.push(ResponderCategory::Medical);
        }

        if classification.requires_any(&LOGISTICS_RESOURCES) {
            targets.push(ResponderCategory::ResourceAllocation);
        }

        if classification.has_escalation_risk()
            || classification.severity_score > self.shelter_severity_threshold
            || report.affected_count() > self.shelter_affected_threshold
        {
            targets.push(ResponderCategory::Shelter);
        }

        targets
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use knowledge_base::{Classifier, KnowledgeBase};
    use triage_core::ReportDraft;

    fn routed(text: &str, affected: u32) -> Vec<ResponderCategory> {
        let classifier = Classifier::new(Arc::new(KnowledgeBase::builtin().unwrap()));
        let classification = classifier.classify(text);
        let report = EmergencyReport::from_classification(
            ReportDraft::text(text).with_affected_count(affected),
            &classification,
        );
        RoutingRules::default().route(&report, &classification)
    }

    #[test]
    fn test_chemical_goes_everywhere() {
        assert_eq!(
            routed("Chemical spill in warehouse, toxic fumes spreading", 1),
            vec![
                ResponderCategory::Medical,
                ResponderCategory::ResourceAllocation,
                ResponderCategory::Shelter
            ]
        );
    }

    #[test]
    fn test_plain_medical() {
        // No escalation risk and severity 5: no shelter.
        assert_eq!(routed("man unconscious on the street", 1), vec![ResponderCategory::Medical]);
    }

    #[test]
    fn test_fire_routes_to_logistics_and_shelter() {
        assert_eq!(
            routed("smoke coming from the roof", 1),
            vec![ResponderCategory::ResourceAllocation, ResponderCategory::Shelter]
        );
    }

    #[test]
    fn test_general_only_by_affected_count() {
        assert!(routed("Building collapse, workers trapped under debris", 1).is_empty());
        assert_eq!(
            routed("Building collapse, workers trapped under debris", 21),
            vec![ResponderCategory::Shelter]
        );
        assert!(routed("Building collapse, workers trapped under debris", 20).is_empty());
    }

    #[test]
    fn test_severity_threshold() {
        // Medical with "critical" reaches 8.0, above the shelter threshold.
        assert_eq!(
            routed("critical heart condition", 1),
            vec![ResponderCategory::Medical, ResponderCategory::Shelter]
        );
    }
}
