//! The classifier's structured decision.

use serde::{Deserialize, Serialize};

use crate::report::{EmergencyType, SeverityBand};
use crate::resource::ResourceKind;

/// Severity assigned when no keyword matched, or before modifiers apply.
pub(crate) const BASE_SEVERITY: f64 = 5.0;

/// Result of classifying a free-text report.
///
/// Derived from a report's text and never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub inferred_type: EmergencyType,
    /// Always within `[0, 10]`.
    pub severity_score: f64,
    /// Winning score divided by the winning type's keyword count.
    /// Not clamped: several matches against a short keyword list exceed 1.
    pub confidence: f64,
    /// Ordered, de-duplicated.
    pub required_resources: Vec<ResourceKind>,
    pub escalation_risks: Vec<EmergencyType>,
}

impl ClassificationResult {
    /// The decision used when no keyword matched.
    pub fn fallback(required_resources: Vec<ResourceKind>) -> Self {
        Self {
            inferred_type: EmergencyType::General,
            severity_score: BASE_SEVERITY,
            confidence: 0.0,
            required_resources,
            escalation_risks: Vec::new(),
        }
    }

    pub fn band(&self) -> SeverityBand {
        SeverityBand::from_score(self.severity_score)
    }

    /// Check whether any of the given resources is required.
    pub fn requires_any(&self, resources: &[ResourceKind]) -> bool {
        self.required_resources.iter().any(|r| resources.contains(r))
    }

    pub fn has_escalation_risk(&self) -> bool {
        !self.escalation_risks.is_empty()
    }
}
