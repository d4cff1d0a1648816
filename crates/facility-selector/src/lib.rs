//! Facility inventories and selection.
//!
//! A [`FacilityStore`] holds the facilities of one [`FacilityKind`] and is
//! owned by a single responder. [`FacilityStore::allocate`] picks a facility
//! with the kind's [`SelectionPolicy`] and commits the request against it:
//!
//! - **Nearest-fit** (hospitals, depots): closest facility, no stock filter.
//!   If it cannot cover the request the outcome is a shortage.
//! - **Best-fit** (shelters): facilities with enough free space, scored by
//!   `free space - distance x 10`.
//!
//! Commits are all-or-nothing. Shortages and overflow are outcomes, not errors.

mod error;
mod facility;
mod inventory;
mod pool;
mod selector;
mod store;

pub use error::AllocationError;
pub use facility::{Facility, FacilityKind, SelectionPolicy};
pub use inventory::{Inventory, INVENTORY_PATH_ENV};
pub use pool::ResourcePool;
pub use selector::{select, AllocationRequest};
pub use store::FacilityStore;
