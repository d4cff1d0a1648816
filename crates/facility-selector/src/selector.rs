//! Selection policies over a candidate list.

use triage_core::ResourceKind;

use crate::facility::{Facility, SelectionPolicy};

/// Weight of one km of distance against one unit of free space in best-fit.
const DISTANCE_PENALTY: f64 = 10.0;

/// What a responder wants from a facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationRequest {
    /// Draw `quantity` units from a resource counter.
    Stock {
        resource: ResourceKind,
        quantity: u32,
    },
    /// Place `count` people, raising occupancy.
    Space { count: u32 },
}

impl AllocationRequest {
    pub fn stock(resource: ResourceKind, quantity: u32) -> Self {
        Self::Stock { resource, quantity }
    }

    pub fn space(count: u32) -> Self {
        Self::Space { count }
    }

    /// Units requested.
    pub fn amount(&self) -> u32 {
        match self {
            Self::Stock { quantity, .. } => *quantity,
            Self::Space { count } => *count,
        }
    }

    /// Resource this request draws on.
    pub fn resource(&self) -> ResourceKind {
        match self {
            Self::Stock { resource, .. } => resource.clone(),
            Self::Space { .. } => ResourceKind::ShelterSpace,
        }
    }

    /// What `facility` can offer toward this request.
    pub fn available_at(&self, facility: &Facility) -> u32 {
        match self {
            Self::Stock { resource, .. } => facility.counter(resource),
            Self::Space { .. } => facility.available_space(),
        }
    }

    pub fn fits(&self, facility: &Facility) -> bool {
        self.available_at(facility) >= self.amount()
    }
}

/// Pick a candidate index under `policy`. Pure: nothing is mutated.
///
/// Nearest-fit returns the closest candidate whether or not it can cover
/// the request; the caller reports a shortage. Best-fit only considers
/// candidates that fit and returns `None` when none do.
pub fn select(
    policy: SelectionPolicy,
    candidates: &[Facility],
    request: &AllocationRequest,
) -> Option<usize> {
    match policy {
        SelectionPolicy::NearestFit => nearest(candidates),
        SelectionPolicy::BestFit => best_fit(candidates, request),
    }
}

fn nearest(candidates: &[Facility]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, facility) in candidates.iter().enumerate() {
        match best {
            Some((_, distance)) if facility.distance() >= distance => {}
            _ => best = Some((index, facility.distance())),
        }
    }
    best.map(|(index, _)| index)
}

fn best_fit(candidates: &[Facility], request: &AllocationRequest) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, facility) in candidates.iter().enumerate() {
        if !request.fits(facility) {
            continue;
        }
        let score = f64::from(request.available_at(facility)) - facility.distance() * DISTANCE_PENALTY;
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depots() -> Vec<Facility> {
        vec![
            Facility::new("North Depot", 3.0).with_counter(ResourceKind::RescueBoats, 3),
            Facility::new("Central Depot", 1.5).with_counter(ResourceKind::RescueBoats, 0),
            Facility::new("South Depot", 4.5).with_counter(ResourceKind::RescueBoats, 2),
        ]
    }

    fn shelters() -> Vec<Facility> {
        vec![
            Facility::new("Central Community Center", 2.3).with_occupancy(500, 120),
            Facility::new("North High School", 4.1).with_occupancy(800, 200),
            Facility::new("Convention Center", 3.5).with_occupancy(1200, 450),
        ]
    }

    #[test]
    fn test_nearest_fit_picks_minimum_distance() {
        let request = AllocationRequest::stock(ResourceKind::RescueBoats, 1);
        for _ in 0..5 {
            assert_eq!(select(SelectionPolicy::NearestFit, &depots(), &request), Some(1));
        }
    }

    #[test]
    fn test_nearest_fit_ignores_stock() {
        // Central Depot has no boats but is still the pick.
        let request = AllocationRequest::stock(ResourceKind::RescueBoats, 2);
        let candidates = depots();
        let index = select(SelectionPolicy::NearestFit, &candidates, &request).unwrap();
        assert!(!request.fits(&candidates[index]));
    }

    #[test]
    fn test_nearest_fit_tie_goes_to_first() {
        let candidates = vec![
            Facility::new("A", 2.0),
            Facility::new("B", 1.0),
            Facility::new("C", 1.0),
        ];
        let request = AllocationRequest::space(0);
        assert_eq!(select(SelectionPolicy::NearestFit, &candidates, &request), Some(1));
    }

    #[test]
    fn test_best_fit_scores_space_against_distance() {
        // Scores: 380 - 23 = 357, 600 - 41 = 559, 750 - 35 = 715.
        let request = AllocationRequest::space(80);
        assert_eq!(select(SelectionPolicy::BestFit, &shelters(), &request), Some(2));
    }

    #[test]
    fn test_best_fit_filters_by_space() {
        let request = AllocationRequest::space(700);
        assert_eq!(select(SelectionPolicy::BestFit, &shelters(), &request), Some(2));

        let request = AllocationRequest::space(751);
        assert_eq!(select(SelectionPolicy::BestFit, &shelters(), &request), None);
    }

    #[test]
    fn test_best_fit_accepts_negative_scores() {
        let candidates = vec![Facility::new("Far Hall", 50.0).with_occupancy(100, 0)];
        let request = AllocationRequest::space(10);
        assert_eq!(select(SelectionPolicy::BestFit, &candidates, &request), Some(0));
    }

    #[test]
    fn test_empty_candidates() {
        let request = AllocationRequest::space(1);
        assert_eq!(select(SelectionPolicy::NearestFit, &[], &request), None);
        assert_eq!(select(SelectionPolicy::BestFit, &[], &request), None);
    }
}
