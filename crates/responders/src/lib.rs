//! Responder services and the actor runtime that hosts them.
//!
//! Each responder owns one slice of the inventory exclusively:
//!
//! - [`MedicalResponder`] - hospitals and the ambulance pool
//! - [`ResourceResponder`] - supply depots
//! - [`ShelterResponder`] - shelters
//!
//! A responder runs inside its own task behind a [`ResponderHandle`]. The
//! task processes one message at a time, so inventory updates never race.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use facility_selector::Inventory;
//! use responders::{ResponderConfig, ResponderHandle, ShelterResponder};
//! use triage_core::{EmergencyReport, EmergencyType, LoggingSink};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inventory = Inventory::builtin()?;
//! let (shelter, _task) = ResponderHandle::spawn(
//!     ShelterResponder::new(inventory.shelters),
//!     Arc::new(LoggingSink),
//!     &ResponderConfig::default(),
//! );
//!
//! let report = EmergencyReport::new("EM-1", EmergencyType::Flood, 7.0, "river flooding", 80);
//! let reply = shelter.handle(report).await?;
//! println!("{:?}", reply.outcome);
//! # Ok(())
//! # }
//! ```

mod actor;
mod config;
mod medical;
mod resource;
mod shelter;
mod status;
mod trait_def;

pub use actor::ResponderHandle;
pub use config::ResponderConfig;
pub use medical::MedicalResponder;
pub use resource::ResourceResponder;
pub use shelter::ShelterResponder;
pub use status::{
    DepotStatus, HospitalStatus, MedicalStatus, OccupancyLevel, ResourceStatus, ResponderStatus,
    ShelterOccupancy, ShelterStatus, StockShortage, SHELTER_FULL_PERCENT, SHORTAGE_THRESHOLD,
    UTILIZATION_ALERT_PERCENT,
};
pub use trait_def::Responder;
