//! Emergency reports and the vocabulary used to describe them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classification::ClassificationResult;

/// Fallback location used when a report arrives without coordinates.
pub const DEFAULT_LOCATION: Location = Location {
    lat: 40.7128,
    lng: -74.0060,
};

/// Geographic position of an emergency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Default for Location {
    fn default() -> Self {
        DEFAULT_LOCATION
    }
}

/// Kind of emergency.
///
/// The named variants are the types the built-in fact table knows about.
/// Any other name (for example an escalation target such as
/// `structural_collapse`) is carried through as [`EmergencyType::Other`], so
/// new rows can be added to the fact table without touching this enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmergencyType {
    Medical,
    Fire,
    Flood,
    Chemical,
    Earthquake,
    General,
    Other(String),
}

impl EmergencyType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Medical => "medical",
            Self::Fire => "fire",
            Self::Flood => "flood",
            Self::Chemical => "chemical",
            Self::Earthquake => "earthquake",
            Self::General => "general",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for EmergencyType {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "medical" => Self::Medical,
            "fire" => Self::Fire,
            "flood" => Self::Flood,
            "chemical" => Self::Chemical,
            "earthquake" => Self::Earthquake,
            "general" => Self::General,
            _ => Self::Other(normalized),
        }
    }
}

impl From<String> for EmergencyType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<EmergencyType> for String {
    fn from(value: EmergencyType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse severity band used for routing, quantity tiers and triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityBand {
    Critical,
    High,
    Medium,
    Low,
}

impl SeverityBand {
    /// Band a 0-10 severity score: above 7 is critical, above 5 is high.
    ///
    /// `Low` is never produced from a score; it only appears in fact-table rows.
    pub fn from_score(score: f64) -> Self {
        if score > 7.0 {
            Self::Critical
        } else if score > 5.0 {
            Self::High
        } else {
            Self::Medium
        }
    }

    /// Parse a band label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw input for a report, before classification.
///
/// Free text is the minimal draft; structured callers can also supply an id,
/// a location and the number of people affected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub affected_count: Option<u32>,
}

impl ReportDraft {
    /// A draft carrying only free text.
    pub fn text(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_affected_count(mut self, count: u32) -> Self {
        self.affected_count = Some(count);
        self
    }
}

/// An emergency report. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyReport {
    id: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    location: Location,
    #[serde(rename = "type")]
    emergency_type: EmergencyType,
    #[serde(deserialize_with = "deserialize_severity")]
    severity: f64,
    description: String,
    #[serde(default)]
    affected_count: u32,
}

impl EmergencyReport {
    /// Create a report from explicit fields.
    ///
    /// Severity is clamped to `[0, 10]`; a NaN severity becomes 0.
    pub fn new(
        id: impl Into<String>,
        emergency_type: EmergencyType,
        severity: f64,
        description: impl Into<String>,
        affected_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            location: DEFAULT_LOCATION,
            emergency_type,
            severity: clamp_severity(severity),
            description: description.into(),
            affected_count,
        }
    }

    /// Build the report for a draft from the classifier's decision.
    ///
    /// Missing ids are generated; a missing affected count means one person.
    pub fn from_classification(draft: ReportDraft, classification: &ClassificationResult) -> Self {
        let id = draft
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(generate_report_id);
        Self::new(
            id,
            classification.inferred_type.clone(),
            classification.severity_score,
            draft.description,
            draft.affected_count.unwrap_or(1),
        )
        .at(draft.location.unwrap_or_default())
    }

    /// Return the same report placed at `location`.
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn emergency_type(&self) -> &EmergencyType {
        &self.emergency_type
    }

    pub fn severity(&self) -> f64 {
        self.severity
    }

    pub fn band(&self) -> SeverityBand {
        SeverityBand::from_score(self.severity)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn affected_count(&self) -> u32 {
        self.affected_count
    }
}

fn clamp_severity(severity: f64) -> f64 {
    if severity.is_nan() {
        0.0
    } else {
        severity.clamp(0.0, 10.0)
    }
}

fn deserialize_severity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_severity)
}

fn generate_report_id() -> String {
    format!("EM-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(SeverityBand::from_score(10.0), SeverityBand::Critical);
        assert_eq!(SeverityBand::from_score(7.5), SeverityBand::Critical);
        assert_eq!(SeverityBand::from_score(7.0), SeverityBand::High);
        assert_eq!(SeverityBand::from_score(5.5), SeverityBand::High);
        assert_eq!(SeverityBand::from_score(5.0), SeverityBand::Medium);
        assert_eq!(SeverityBand::from_score(0.0), SeverityBand::Medium);
    }

    #[test]
    fn test_band_parse() {
        assert_eq!(SeverityBand::parse("critical"), Some(SeverityBand::Critical));
        assert_eq!(SeverityBand::parse(" HIGH "), Some(SeverityBand::High));
        assert_eq!(SeverityBand::parse("Low"), Some(SeverityBand::Low));
        assert_eq!(SeverityBand::parse("extreme"), None);
    }

    #[test]
    fn test_emergency_type_names() {
        assert_eq!(EmergencyType::from("Fire"), EmergencyType::Fire);
        assert_eq!(
            EmergencyType::from("structural_collapse"),
            EmergencyType::Other("structural_collapse".to_string())
        );
        assert_eq!(EmergencyType::Chemical.to_string(), "chemical");
    }

    #[test]
    fn test_emergency_type_serde() {
        let json = serde_json::to_string(&EmergencyType::Flood).unwrap();
        assert_eq!(json, "\"flood\"");

        let parsed: EmergencyType = serde_json::from_str("\"disease_outbreak\"").unwrap();
        assert_eq!(parsed.as_str(), "disease_outbreak");
    }

    #[test]
    fn test_report_clamps_severity() {
        let report = EmergencyReport::new("r1", EmergencyType::Fire, 14.0, "fire", 3);
        assert_eq!(report.severity(), 10.0);

        let report = EmergencyReport::new("r2", EmergencyType::Fire, -2.0, "fire", 3);
        assert_eq!(report.severity(), 0.0);

        let report = EmergencyReport::new("r3", EmergencyType::Fire, f64::NAN, "fire", 3);
        assert_eq!(report.severity(), 0.0);
    }

    #[test]
    fn test_report_from_draft() {
        let classification = ClassificationResult::fallback(vec![]);
        let draft = ReportDraft::text("something odd")
            .with_affected_count(12)
            .with_location(Location { lat: 1.0, lng: 2.0 });

        let report = EmergencyReport::from_classification(draft, &classification);
        assert!(report.id().starts_with("EM-"));
        assert_eq!(report.affected_count(), 12);
        assert_eq!(report.location(), Location { lat: 1.0, lng: 2.0 });
        assert_eq!(report.emergency_type(), &EmergencyType::General);
        assert_eq!(report.band(), SeverityBand::Medium);
    }

    #[test]
    fn test_report_keeps_caller_id() {
        let classification = ClassificationResult::fallback(vec![]);
        let report = EmergencyReport::from_classification(
            ReportDraft::text("x").with_id("TEST-001"),
            &classification,
        );
        assert_eq!(report.id(), "TEST-001");
        assert_eq!(report.affected_count(), 1);
    }

    #[test]
    fn test_report_deserialize() {
        let json = r#"{
            "id": "B-1",
            "created_at": "2024-05-01T12:00:00Z",
            "type": "flood",
            "severity": 6.5,
            "description": "river overflow",
            "affected_count": 80
        }"#;
        let report: EmergencyReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.emergency_type(), &EmergencyType::Flood);
        assert_eq!(report.location(), DEFAULT_LOCATION);
        assert_eq!(report.band(), SeverityBand::High);
    }

    #[test]
    fn test_report_deserialize_clamps_severity() {
        let json = r#"{
            "id": "B-2",
            "created_at": "2024-05-01T12:00:00Z",
            "type": "fire",
            "severity": 42.0,
            "description": "blaze"
        }"#;
        let report: EmergencyReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.severity(), 10.0);
        assert_eq!(report.affected_count(), 0);
    }
}
