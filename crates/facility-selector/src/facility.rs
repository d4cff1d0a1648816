//! Facilities and the per-kind selection rules.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use triage_core::ResourceKind;

/// Kind of facility a responder draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    Hospital,
    Depot,
    Shelter,
}

/// How a facility is picked among candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Minimum distance, first declared on ties. Stock is not considered.
    NearestFit,
    /// Filter by available space, then maximize `available - distance x 10`.
    BestFit,
}

impl FacilityKind {
    pub fn policy(&self) -> SelectionPolicy {
        match self {
            Self::Hospital | Self::Depot => SelectionPolicy::NearestFit,
            Self::Shelter => SelectionPolicy::BestFit,
        }
    }

    /// Minutes of travel per km, used for ETAs.
    pub fn minutes_per_km(&self) -> f64 {
        match self {
            Self::Hospital => 3.0,
            Self::Depot => 10.0,
            Self::Shelter => 5.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Depot => "depot",
            Self::Shelter => "shelter",
        }
    }
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capacity-bearing resource provider.
///
/// Fields are read-only from outside the crate; a facility is only mutated
/// through its [`FacilityStore`](crate::FacilityStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    name: String,
    /// Distance from the incident area, in km.
    distance: f64,
    #[serde(default)]
    capacity: u32,
    #[serde(default)]
    current_load: u32,
    #[serde(default)]
    counters: IndexMap<ResourceKind, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    amenities: Vec<String>,
    #[serde(default)]
    pets_allowed: bool,
}

impl Facility {
    pub fn new(name: impl Into<String>, distance: f64) -> Self {
        Self {
            name: name.into(),
            distance,
            capacity: 0,
            current_load: 0,
            counters: IndexMap::new(),
            address: None,
            amenities: Vec::new(),
            pets_allowed: false,
        }
    }

    pub fn with_occupancy(mut self, capacity: u32, current_load: u32) -> Self {
        self.capacity = capacity;
        self.current_load = current_load;
        self
    }

    pub fn with_counter(mut self, resource: ResourceKind, count: u32) -> Self {
        self.counters.insert(resource, count);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.amenities = amenities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pets_allowed(mut self, allowed: bool) -> Self {
        self.pets_allowed = allowed;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn current_load(&self) -> u32 {
        self.current_load
    }

    /// Free space: `capacity - current_load`.
    pub fn available_space(&self) -> u32 {
        self.capacity.saturating_sub(self.current_load)
    }

    /// Stock of a resource; zero when the facility does not carry it.
    pub fn counter(&self, resource: &ResourceKind) -> u32 {
        self.counters.get(resource).copied().unwrap_or(0)
    }

    pub fn counters(&self) -> impl Iterator<Item = (&ResourceKind, u32)> {
        self.counters.iter().map(|(k, v)| (k, *v))
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn amenities(&self) -> &[String] {
        &self.amenities
    }

    pub fn pets_allowed(&self) -> bool {
        self.pets_allowed
    }

    /// Occupancy as a percentage of capacity; 0 for facilities without one.
    pub fn occupancy_percent(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            f64::from(self.current_load) / f64::from(self.capacity) * 100.0
        }
    }

    /// Travel time to this facility in whole minutes.
    pub fn eta_minutes(&self, kind: FacilityKind) -> u32 {
        (self.distance * kind.minutes_per_km()) as u32
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is empty".to_string());
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(format!("distance {} is not a non-negative number", self.distance));
        }
        if self.current_load > self.capacity {
            return Err(format!(
                "current load {} exceeds capacity {}",
                self.current_load, self.capacity
            ));
        }
        Ok(())
    }

    /// Decrement a counter. Caller has checked the stock.
    pub(crate) fn take(&mut self, resource: &ResourceKind, quantity: u32) {
        if let Some(count) = self.counters.get_mut(resource) {
            *count = count.saturating_sub(quantity);
        }
    }

    /// Increment occupancy, never past capacity.
    pub(crate) fn occupy(&mut self, count: u32) {
        self.current_load = self.current_load.saturating_add(count).min(self.capacity);
    }
}
