//! Batch files for `triage rank`.

use std::fs;
use std::path::Path;

use knowledge_base::Classifier;
use serde::Deserialize;
use triage_core::{EmergencyReport, ReportDraft};

/// One entry of a batch file: either an already classified report or a
/// draft that still needs classification.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Report(EmergencyReport),
    Draft(ReportDraft),
}

impl BatchEntry {
    pub fn into_report(self, classifier: &Classifier) -> EmergencyReport {
        match self {
            Self::Report(report) => report,
            Self::Draft(draft) => {
                let classification = classifier.classify(&draft.description);
                EmergencyReport::from_classification(draft, &classification)
            }
        }
    }
}

pub fn parse_batch(json: &str, classifier: &Classifier) -> Result<Vec<EmergencyReport>, serde_json::Error> {
    let entries: Vec<BatchEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .map(|entry| entry.into_report(classifier))
        .collect())
}

pub fn load_batch(
    path: &Path,
    classifier: &Classifier,
) -> Result<Vec<EmergencyReport>, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    Ok(parse_batch(&json, classifier)?)
}
