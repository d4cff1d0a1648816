//! Status summaries and free-text status queries.

use std::fmt::Write;

use indexmap::IndexMap;
use responders::ResponderStatus;
use serde::{Deserialize, Serialize};
use triage_core::ResponderCategory;

use crate::state::ReportState;

/// Pure read over the coordinator's current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Resident reports not yet confirmed.
    pub active_count: usize,
    /// Active reports in the critical band.
    pub critical_count: usize,
    /// Resident reports dispatched to each category.
    pub by_category: IndexMap<ResponderCategory, usize>,
    pub by_state: IndexMap<ReportState, usize>,
    pub total_reports: usize,
    pub citizens_online: usize,
}

/// What a free-text status query asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTopic {
    Overview,
    Responder(ResponderCategory),
    All,
}

impl StatusTopic {
    /// Interpret a query such as "shelter status" or "how many ambulances".
    ///
    /// A query naming exactly one responder area targets it; anything else
    /// gets the overview plus every responder.
    pub fn parse(query: &str) -> Self {
        let query = query.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| query.contains(w));

        let mut topics = Vec::new();
        if mentions(&["medical", "ambulance", "hospital", "icu"]) {
            topics.push(ResponderCategory::Medical);
        }
        if mentions(&["resource", "depot", "supplies", "supply", "equipment", "inventory"]) {
            topics.push(ResponderCategory::ResourceAllocation);
        }
        if mentions(&["shelter", "evacuat", "capacity"]) {
            topics.push(ResponderCategory::Shelter);
        }

        match topics.as_slice() {
            [single] => Self::Responder(*single),
            [] if mentions(&["summary", "overview", "active", "emergencies"]) => Self::Overview,
            _ => Self::All,
        }
    }

    pub fn includes(&self, category: ResponderCategory) -> bool {
        match self {
            Self::Overview => false,
            Self::Responder(c) => *c == category,
            Self::All => true,
        }
    }
}

/// Structured answer to a status query.
///
/// Holds facts only; [`StatusReport::render`] gives a plain-text form for
/// callers that have no presentation layer of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub summary: StatusSummary,
    pub responders: Vec<ResponderStatus>,
}

impl StatusReport {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let s = &self.summary;
        let _ = writeln!(
            out,
            "Active emergencies: {} ({} critical), {} total, {} citizens online",
            s.active_count, s.critical_count, s.total_reports, s.citizens_online
        );
        for (category, count) in &s.by_category {
            let _ = writeln!(out, "  {}: {} dispatched", category.label(), count);
        }

        for status in &self.responders {
            match status {
                ResponderStatus::Medical(m) => {
                    let _ = writeln!(
                        out,
                        "Ambulances: {} available, {} dispatched",
                        m.ambulances_available, m.ambulances_dispatched
                    );
                    for h in &m.hospitals {
                        let _ = writeln!(
                            out,
                            "  {}: {} beds, {} ICU, {:.1} km",
                            h.name, h.available_beds, h.icu_available, h.distance
                        );
                    }
                }
                ResponderStatus::ResourceAllocation(r) => {
                    let _ = writeln!(out, "Depots: {}", r.depots.len());
                    for d in &r.depots {
                        let stock: Vec<String> =
                            d.stock.iter().map(|(k, v)| format!("{} {}", v, k.label())).collect();
                        let _ = writeln!(out, "  {} ({:.1} km): {}", d.name, d.distance, stock.join(", "));
                    }
                }
                ResponderStatus::Shelter(sh) => {
                    let _ = writeln!(
                        out,
                        "Shelters: {}/{} occupied ({:.1}%)",
                        sh.total_occupied, sh.total_capacity, sh.utilization_percent
                    );
                    for o in &sh.shelters {
                        let _ = writeln!(
                            out,
                            "  {}: {} spaces free, {:.1}% ({:?})",
                            o.name, o.available, o.occupancy_percent, o.level
                        );
                    }
                }
            }
            for alert in status.alerts() {
                let _ = writeln!(out, "  ! {}", alert);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use responders::{MedicalStatus, ResourceStatus};

    #[test]
    fn test_topic_parse() {
        assert_eq!(
            StatusTopic::parse("How many ambulances are free?"),
            StatusTopic::Responder(ResponderCategory::Medical)
        );
        assert_eq!(
            StatusTopic::parse("shelter capacity"),
            StatusTopic::Responder(ResponderCategory::Shelter)
        );
        assert_eq!(
            StatusTopic::parse("Depot inventory"),
            StatusTopic::Responder(ResponderCategory::ResourceAllocation)
        );
        assert_eq!(StatusTopic::parse("active emergencies?"), StatusTopic::Overview);
        assert_eq!(StatusTopic::parse("status"), StatusTopic::All);
        assert_eq!(StatusTopic::parse("hospital and shelter"), StatusTopic::All);
    }

    #[test]
    fn test_topic_includes() {
        assert!(StatusTopic::All.includes(ResponderCategory::Shelter));
        assert!(!StatusTopic::Overview.includes(ResponderCategory::Shelter));
        assert!(StatusTopic::Responder(ResponderCategory::Medical).includes(ResponderCategory::Medical));
        assert!(!StatusTopic::Responder(ResponderCategory::Medical).includes(ResponderCategory::Shelter));
    }

    #[test]
    fn test_render() {
        let mut by_category = IndexMap::new();
        by_category.insert(ResponderCategory::Medical, 2);
        let report = StatusReport {
            summary: StatusSummary {
                active_count: 2,
                critical_count: 1,
                by_category,
                by_state: IndexMap::new(),
                total_reports: 3,
                citizens_online: 1,
            },
            responders: vec![
                ResponderStatus::Medical(MedicalStatus {
                    ambulances_available: 12,
                    ambulances_dispatched: 3,
                    hospitals: Vec::new(),
                }),
                ResponderStatus::ResourceAllocation(ResourceStatus {
                    depots: Vec::new(),
                    critical_shortages: Vec::new(),
                }),
            ],
        };
        let text = report.render();
        assert!(text.starts_with("Active emergencies: 2 (1 critical), 3 total, 1 citizens online"));
        assert!(text.contains("Medical Response: 2 dispatched"));
        assert!(text.contains("Ambulances: 12 available, 3 dispatched"));
        assert!(text.contains("Depots: 0"));
    }
}
