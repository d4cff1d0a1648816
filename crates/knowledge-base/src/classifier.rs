//! Keyword classifier: free text to a structured decision.

use std::sync::Arc;

use tracing::debug;
use triage_core::ClassificationResult;

use crate::knowledge::KnowledgeBase;

/// Points a type scores for each of its keywords found in the text.
const KEYWORD_WEIGHT: f64 = 2.0;

/// Deterministic keyword scorer backed by a [`KnowledgeBase`].
///
/// Pure and cheap to clone; safe to call from any number of tasks.
#[derive(Debug, Clone)]
pub struct Classifier {
    knowledge: Arc<KnowledgeBase>,
}

impl Classifier {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    /// Classify a report's text.
    ///
    /// Each type scores 2 per keyword appearing as a substring of the
    /// lower-cased text. The highest score wins and ties go to the type
    /// declared first. When nothing scores, the fallback type is returned
    /// with base severity and zero confidence.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let text = text.to_lowercase();

        let mut winner = None;
        let mut best = 0.0;
        for (emergency_type, facts) in self.knowledge.types() {
            let score = KEYWORD_WEIGHT
                * facts
                    .keywords
                    .iter()
                    .filter(|keyword| text.contains(keyword.as_str()))
                    .count() as f64;
            if score > best {
                best = score;
                winner = Some((emergency_type, facts));
            }
        }

        let Some((emergency_type, facts)) = winner else {
            let fallback = self.knowledge.fallback_type();
            debug!(inferred_type = %fallback, "No keyword matched");
            let mut result =
                ClassificationResult::fallback(self.knowledge.required_resources(fallback));
            result.inferred_type = fallback.clone();
            result.severity_score = clamp(self.knowledge.base_severity());
            return result;
        };

        let severity = facts
            .severity_modifiers
            .iter()
            .filter(|(keyword, _)| text.contains(keyword.as_str()))
            .fold(self.knowledge.base_severity(), |acc, (_, points)| acc + points);

        let confidence = best / facts.keywords.len().max(1) as f64;

        let result = ClassificationResult {
            inferred_type: emergency_type.clone(),
            severity_score: clamp(severity),
            confidence,
            required_resources: facts.resources.clone(),
            escalation_risks: facts.escalates_to.clone(),
        };
        debug!(
            inferred_type = %result.inferred_type,
            severity = result.severity_score,
            confidence = result.confidence,
            "Classified report"
        );
        result
    }
}

fn clamp(severity: f64) -> f64 {
    severity.clamp(0.0, 10.0)
}
