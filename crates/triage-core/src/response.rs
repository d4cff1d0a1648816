//! Responder categories and the response message they send back.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the independent responder services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponderCategory {
    Medical,
    ResourceAllocation,
    Shelter,
}

impl ResponderCategory {
    /// Every category, in dispatch order.
    pub const ALL: [ResponderCategory; 3] = [Self::Medical, Self::ResourceAllocation, Self::Shelter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::ResourceAllocation => "resource_allocation",
            Self::Shelter => "shelter",
        }
    }

    /// Display name for status output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Medical => "Medical Response",
            Self::ResourceAllocation => "Resource Allocation",
            Self::Shelter => "Shelter Coordination",
        }
    }
}

impl fmt::Display for ResponderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response a responder sends to the coordinator after handling a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyResponse {
    pub report_id: String,
    /// Free-text status label, e.g. "Medical teams dispatched".
    pub status: String,
    pub dispatch_time: DateTime<Utc>,
    pub teams_assigned: u32,
    pub details: String,
}

impl EmergencyResponse {
    /// Create a response stamped with the current time.
    pub fn new(
        report_id: impl Into<String>,
        status: impl Into<String>,
        teams_assigned: u32,
        details: impl Into<String>,
    ) -> Self {
        Self {
            report_id: report_id.into(),
            status: status.into(),
            dispatch_time: Utc::now(),
            teams_assigned,
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ResponderCategory::ResourceAllocation).unwrap();
        assert_eq!(json, "\"resource_allocation\"");
    }

    #[test]
    fn test_response_new() {
        let response = EmergencyResponse::new("EM-1", "Shelter assigned", 80, "Convention Center");
        assert_eq!(response.report_id, "EM-1");
        assert_eq!(response.teams_assigned, 80);
    }
}
