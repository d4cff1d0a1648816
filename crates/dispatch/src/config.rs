//! Coordinator configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::DispatchError;

/// Settings for the dispatch coordinator.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Shelter is targeted when more people than this are affected.
    pub shelter_affected_threshold: u32,
    /// Shelter is targeted when severity exceeds this.
    pub shelter_severity_threshold: f64,
    /// Time a dispatched report may wait for responses before going stale.
    pub response_deadline: Duration,
    /// How often the stale sweep runs.
    pub stale_sweep_interval: Duration,
    /// Bounded mailbox size for the coordinator.
    pub mailbox_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            shelter_affected_threshold: 20,
            shelter_severity_threshold: 6.0,
            response_deadline: Duration::from_secs(300),
            stale_sweep_interval: Duration::from_secs(30),
            mailbox_capacity: 100,
        }
    }
}

impl DispatchConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional (with defaults):
    /// - `TRIAGE_SHELTER_AFFECTED_THRESHOLD` - Default: 20
    /// - `TRIAGE_SHELTER_SEVERITY_THRESHOLD` - Default: 6.0
    /// - `TRIAGE_RESPONSE_DEADLINE_SECS` - Default: 300
    /// - `TRIAGE_STALE_SWEEP_SECS` - Default: 30
    /// - `TRIAGE_MAILBOX_CAPACITY` - Default: 100
    pub fn from_env() -> Result<Self, DispatchError> {
        let defaults = Self::default();

        let shelter_severity_threshold: f64 = parse_var(
            "TRIAGE_SHELTER_SEVERITY_THRESHOLD",
            defaults.shelter_severity_threshold,
        )?;
        if !shelter_severity_threshold.is_finite() {
            return Err(DispatchError::Configuration(
                "TRIAGE_SHELTER_SEVERITY_THRESHOLD must be a finite number".to_string(),
            ));
        }

        let sweep_secs: u64 = parse_var("TRIAGE_STALE_SWEEP_SECS", 30)?;
        let mailbox_capacity: usize = parse_var("TRIAGE_MAILBOX_CAPACITY", defaults.mailbox_capacity)?;
        if sweep_secs == 0 || mailbox_capacity == 0 {
            return Err(DispatchError::Configuration(
                "TRIAGE_STALE_SWEEP_SECS and TRIAGE_MAILBOX_CAPACITY must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            shelter_affected_threshold: parse_var(
                "TRIAGE_SHELTER_AFFECTED_THRESHOLD",
                defaults.shelter_affected_threshold,
            )?,
            shelter_severity_threshold,
            response_deadline: Duration::from_secs(parse_var("TRIAGE_RESPONSE_DEADLINE_SECS", 300)?),
            stale_sweep_interval: Duration::from_secs(sweep_secs),
            mailbox_capacity,
        })
    }

    pub fn with_response_deadline(mut self, deadline: Duration) -> Self {
        self.response_deadline = deadline;
        self
    }

    pub fn with_stale_sweep_interval(mut self, interval: Duration) -> Self {
        self.stale_sweep_interval = interval;
        self
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, DispatchError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| DispatchError::Configuration(format!("Invalid {}: {}", name, e))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.shelter_affected_threshold, 20);
        assert_eq!(config.shelter_severity_threshold, 6.0);
        assert_eq!(config.response_deadline, Duration::from_secs(300));
        assert_eq!(config.stale_sweep_interval, Duration::from_secs(30));
        assert_eq!(config.mailbox_capacity, 100);
    }

    #[test]
    fn test_builders() {
        let config = DispatchConfig::default()
            .with_response_deadline(Duration::from_secs(5))
            .with_stale_sweep_interval(Duration::from_secs(1));
        assert_eq!(config.response_deadline, Duration::from_secs(5));
        assert_eq!(config.stale_sweep_interval, Duration::from_secs(1));
    }
}
