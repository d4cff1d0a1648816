//! Citizen chat sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prompt returned when a citizen opens a session.
pub const INTAKE_PROMPT: &str = "Emergency response coordinator.\n\
Please describe your emergency, including:\n\
- What happened\n\
- Location\n\
- Number of people affected\n\
- Any immediate dangers";

/// An open session with one citizen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitizenSession {
    pub started_at: DateTime<Utc>,
    pub messages: u32,
}

impl CitizenSession {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            messages: 0,
        }
    }
}

/// Summary of a session that just ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub sender: String,
    pub duration_secs: i64,
    pub messages: u32,
}
