//! Priority ranking of concurrent emergencies.

use std::cmp::Ordering;
use std::sync::Arc;

use knowledge_base::KnowledgeBase;
use serde::{Deserialize, Serialize};
use triage_core::{EmergencyReport, EmergencyType, ResourceKind, SeverityBand};

/// A report annotated with its triage priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedReport {
    pub report_id: String,
    #[serde(rename = "type")]
    pub emergency_type: EmergencyType,
    pub band: SeverityBand,
    pub affected_count: u32,
    /// `affected_count x coefficient(type, band)`.
    pub triage_score: f64,
    pub assigned_resources: Vec<ResourceKind>,
    pub optimal_resource: Option<ResourceKind>,
    pub escalation_watch: Vec<EmergencyType>,
    /// Highest `priority_for(band, r)` over the assigned resources.
    pub resource_priority: f64,
    /// Ids of other reports in the batch this one should be handled with.
    pub collaborate_with: Vec<String>,
}

/// Ranks batches of reports using the knowledge base.
#[derive(Debug, Clone)]
pub struct PriorityOptimizer {
    knowledge: Arc<KnowledgeBase>,
}

impl PriorityOptimizer {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    /// Annotate and sort a batch by descending triage score.
    ///
    /// The output has one entry per input report. The sort is stable, so
    /// reports with equal scores keep their input order.
    pub fn rank(&self, reports: &[EmergencyReport]) -> Vec<RankedReport> {
        let mut ranked: Vec<RankedReport> = reports
            .iter()
            .enumerate()
            .map(|(index, report)| self.annotate(index, report, reports))
            .collect();

        ranked.sort_by(|a, b| {
            b.triage_score
                .partial_cmp(&a.triage_score)
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }

    fn annotate(&self, index: usize, report: &EmergencyReport, batch: &[EmergencyReport]) -> RankedReport {
        let kb = &self.knowledge;
        let emergency_type = report.emergency_type();
        let band = report.band();
        let assigned_resources = kb.required_resources(emergency_type);

        let resource_priority = assigned_resources
            .iter()
            .map(|resource| kb.priority_for(band, resource))
            .fold(0.0, f64::max);

        let collaborate_with = batch
            .iter()
            .enumerate()
            .filter(|(other, candidate)| {
                *other != index && kb.should_collaborate(emergency_type, candidate.emergency_type())
            })
            .map(|(_, candidate)| candidate.id().to_string())
            .collect();

        RankedReport {
            report_id: report.id().to_string(),
            emergency_type: emergency_type.clone(),
            band,
            affected_count: report.affected_count(),
            triage_score: kb.triage_score(emergency_type, band, report.affected_count()),
            assigned_resources,
            optimal_resource: kb.optimal_resource(emergency_type, band).cloned(),
            escalation_watch: kb.escalation_risk(emergency_type),
            resource_priority,
            collaborate_with,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimizer() -> PriorityOptimizer {
        PriorityOptimizer::new(Arc::new(KnowledgeBase::builtin().unwrap()))
    }

    fn report(id: &str, emergency_type: EmergencyType, severity: f64, affected: u32) -> EmergencyReport {
        EmergencyReport::new(id, emergency_type, severity, "test", affected)
    }

    #[test]
    fn test_collaboration_is_mutual() {
        let batch = vec![
            report("EM-FLOOD", EmergencyType::Flood, 6.0, 80),
            report("EM-MED", EmergencyType::Medical, 8.0, 15),
        ];
        let ranked = optimizer().rank(&batch);

        let flood = ranked.iter().find(|r| r.report_id == "EM-FLOOD").unwrap();
        let medical = ranked.iter().find(|r| r.report_id == "EM-MED").unwrap();
        assert_eq!(flood.collaborate_with, vec!["EM-MED".to_string()]);
        assert_eq!(medical.collaborate_with, vec!["EM-FLOOD".to_string()]);
    }

    #[test]
    fn test_sorted_by_triage_score() {
        let batch = vec![
            report("A", EmergencyType::Chemical, 6.0, 50),
            report("B", EmergencyType::Flood, 6.0, 80),
            report("C", EmergencyType::Medical, 8.0, 15),
            report("D", EmergencyType::Fire, 9.0, 1),
        ];
        let ranked = optimizer().rank(&batch);

        let ids: Vec<&str> = ranked.iter().map(|r| r.report_id.as_str()).collect();
        // B: 80 x 6 = 480, C: 15 x 10 = 150, A: 50 x 1, D: 1 x 9.
        assert_eq!(ids, vec!["B", "C", "A", "D"]);
        assert_eq!(ranked[0].triage_score, 480.0);
        assert_eq!(ranked.len(), batch.len());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let batch = vec![
            report("first", EmergencyType::General, 5.0, 10),
            report("second", EmergencyType::Earthquake, 5.0, 10),
            report("third", EmergencyType::General, 5.0, 10),
        ];
        let ids: Vec<String> = optimizer().rank(&batch).into_iter().map(|r| r.report_id).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_annotations() {
        let ranked = optimizer().rank(&[report("M", EmergencyType::Medical, 8.0, 3)]);
        let medical = &ranked[0];
        assert_eq!(medical.band, SeverityBand::Critical);
        assert_eq!(medical.optimal_resource, Some(ResourceKind::Ambulance));
        assert_eq!(medical.resource_priority, 10.0);
        assert!(medical.escalation_watch.is_empty());
        assert!(medical.collaborate_with.is_empty());
    }

    #[test]
    fn test_empty_batch() {
        assert!(optimizer().rank(&[]).is_empty());
    }

    #[test]
    fn test_scores_non_increasing() {
        let batch: Vec<EmergencyReport> = (0..20)
            .map(|i| {
                let kind = match i % 4 {
                    0 => EmergencyType::Medical,
                    1 => EmergencyType::Fire,
                    2 => EmergencyType::Flood,
                    _ => EmergencyType::Chemical,
                };
                report(&format!("EM-{}", i), kind, (i % 10) as f64, (i * 7 % 50) as u32)
            })
            .collect();
        let ranked = optimizer().rank(&batch);
        assert_eq!(ranked.len(), batch.len());
        assert!(ranked.windows(2).all(|w| w[0].triage_score >= w[1].triage_score));
    }
}
