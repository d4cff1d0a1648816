//! Responder runtime configuration.

use std::env;
use std::time::Duration;

use triage_core::TriageError;

/// Settings for responder actors.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// Bounded mailbox size per responder.
    pub mailbox_capacity: usize,
    /// How often each responder logs inventory alerts. `None` disables it.
    pub monitor_interval: Option<Duration>,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 100,
            monitor_interval: Some(Duration::from_secs(60)),
        }
    }
}

impl ResponderConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional (with defaults):
    /// - `TRIAGE_MAILBOX_CAPACITY` - Default: 100
    /// - `TRIAGE_MONITOR_SECS` - Default: 60, 0 disables monitoring
    pub fn from_env() -> Result<Self, TriageError> {
        let mailbox_capacity = env::var("TRIAGE_MAILBOX_CAPACITY")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<usize>()
            .map_err(|e| TriageError::Configuration(format!("Invalid TRIAGE_MAILBOX_CAPACITY: {}", e)))?;
        if mailbox_capacity == 0 {
            return Err(TriageError::Configuration(
                "TRIAGE_MAILBOX_CAPACITY must be at least 1".to_string(),
            ));
        }

        let monitor_secs = env::var("TRIAGE_MONITOR_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .map_err(|e| TriageError::Configuration(format!("Invalid TRIAGE_MONITOR_SECS: {}", e)))?;

        Ok(Self {
            mailbox_capacity,
            monitor_interval: (monitor_secs > 0).then(|| Duration::from_secs(monitor_secs)),
        })
    }

    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity.max(1);
        self
    }

    pub fn without_monitor(mut self) -> Self {
        self.monitor_interval = None;
        self
    }
}
