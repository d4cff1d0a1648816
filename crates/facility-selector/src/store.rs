//! A responder's privately owned list of facilities.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use triage_core::{ResourceKind, SelectionOutcome};

use crate::error::AllocationError;
use crate::facility::{Facility, FacilityKind};
use crate::selector::{select, AllocationRequest};

/// Facilities of one kind, mutated only through [`FacilityStore::allocate`].
///
/// For every facility `0 <= current_load <= capacity` holds and counters
/// never go below zero. A store is owned by exactly one responder.
#[derive(Debug, Clone)]
pub struct FacilityStore {
    kind: FacilityKind,
    facilities: Vec<Facility>,
}

impl FacilityStore {
    /// Validate and take ownership of `facilities`, keeping their order.
    pub fn new(kind: FacilityKind, facilities: Vec<Facility>) -> Result<Self, AllocationError> {
        let mut names = HashSet::new();
        for facility in &facilities {
            facility
                .validate()
                .map_err(|reason| AllocationError::InvalidFacility {
                    facility: facility.name().to_string(),
                    reason,
                })?;
            if !names.insert(facility.name().to_string()) {
                return Err(AllocationError::DuplicateFacility(facility.name().to_string()));
            }
        }
        Ok(Self { kind, facilities })
    }

    pub fn kind(&self) -> FacilityKind {
        self.kind
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn get(&self, name: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.name() == name)
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Pick the facility the store's policy would use, without committing.
    pub fn select(&self, request: &AllocationRequest) -> Option<&Facility> {
        select(self.kind.policy(), &self.facilities, request).map(|i| &self.facilities[i])
    }

    /// Select a facility and commit the request against it.
    ///
    /// All-or-nothing: when the selected facility cannot cover the full
    /// request the outcome is a shortage and nothing changes.
    pub fn allocate(&mut self, request: &AllocationRequest) -> SelectionOutcome {
        let Some(index) = select(self.kind.policy(), &self.facilities, request) else {
            warn!(kind = %self.kind, requested = request.amount(), "No suitable facility");
            return SelectionOutcome::NoSuitableFacility {
                requested: request.amount(),
            };
        };
        self.commit(index, request)
    }

    /// Commit against a named facility, bypassing selection.
    ///
    /// Used for secondary reservations at a facility already chosen.
    pub fn allocate_at(&mut self, name: &str, request: &AllocationRequest) -> SelectionOutcome {
        match self.facilities.iter().position(|f| f.name() == name) {
            Some(index) => self.commit(index, request),
            None => SelectionOutcome::NoSuitableFacility {
                requested: request.amount(),
            },
        }
    }

    fn commit(&mut self, index: usize, request: &AllocationRequest) -> SelectionOutcome {
        let kind = self.kind;
        let facility = &mut self.facilities[index];
        let eta_minutes = facility.eta_minutes(kind);

        if !request.fits(facility) {
            info!(
                facility = facility.name(),
                resource = %request.resource(),
                requested = request.amount(),
                available = request.available_at(facility),
                "Insufficient stock, nothing allocated"
            );
            return SelectionOutcome::Shortage {
                requested_resource: request.resource(),
                requested: request.amount(),
                facility: facility.name().to_string(),
                eta_minutes,
            };
        }

        match request {
            AllocationRequest::Stock { resource, quantity } => facility.take(resource, *quantity),
            AllocationRequest::Space { count } => facility.occupy(*count),
        }

        debug!(
            facility = facility.name(),
            resource = %request.resource(),
            quantity = request.amount(),
            eta_minutes,
            "Allocated"
        );
        SelectionOutcome::Allocated {
            resource: request.resource(),
            quantity: request.amount(),
            facility: facility.name().to_string(),
            eta_minutes,
        }
    }

    /// Sum of a resource counter across all facilities.
    pub fn total_stock(&self, resource: &ResourceKind) -> u32 {
        self.facilities.iter().map(|f| f.counter(resource)).sum()
    }

    pub fn total_capacity(&self) -> u32 {
        self.facilities.iter().map(Facility::capacity).sum()
    }

    pub fn total_load(&self) -> u32 {
        self.facilities.iter().map(Facility::current_load).sum()
    }

    /// Overall occupancy as a percentage; 0 when there is no capacity.
    pub fn utilization_percent(&self) -> f64 {
        let capacity = self.total_capacity();
        if capacity == 0 {
            0.0
        } else {
            f64::from(self.total_load()) / f64::from(capacity) * 100.0
        }
    }
}
