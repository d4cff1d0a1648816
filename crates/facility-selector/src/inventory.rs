//! Starting inventory for every responder.

use std::env;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::AllocationError;
use crate::facility::{Facility, FacilityKind};
use crate::pool::ResourcePool;
use crate::store::FacilityStore;

const BUILTIN_INVENTORY: &str = include_str!("../assets/inventory.json");

/// Env var naming an inventory file that replaces the built-in one.
pub const INVENTORY_PATH_ENV: &str = "TRIAGE_INVENTORY_PATH";

#[derive(Debug, Deserialize)]
struct InventoryFile {
    #[serde(default)]
    hospitals: Vec<Facility>,
    #[serde(default)]
    ambulances: ResourcePool,
    #[serde(default)]
    depots: Vec<Facility>,
    #[serde(default)]
    shelters: Vec<Facility>,
}

/// Validated facilities, split into the stores each responder will own.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub hospitals: FacilityStore,
    pub ambulances: ResourcePool,
    pub depots: FacilityStore,
    pub shelters: FacilityStore,
}

impl Inventory {
    pub fn builtin() -> Result<Self, AllocationError> {
        Self::from_json(BUILTIN_INVENTORY)
    }

    pub fn from_json(json: &str) -> Result<Self, AllocationError> {
        let file: InventoryFile = serde_json::from_str(json)?;
        Ok(Self {
            hospitals: FacilityStore::new(FacilityKind::Hospital, file.hospitals)?,
            ambulances: file.ambulances,
            depots: FacilityStore::new(FacilityKind::Depot, file.depots)?,
            shelters: FacilityStore::new(FacilityKind::Shelter, file.shelters)?,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AllocationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AllocationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loading inventory");
        Self::from_json(&json)
    }

    /// Load the file named by `TRIAGE_INVENTORY_PATH`, or the built-in one.
    pub fn from_env() -> Result<Self, AllocationError> {
        match env::var(INVENTORY_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_path(path.trim()),
            _ => Self::builtin(),
        }
    }
}
