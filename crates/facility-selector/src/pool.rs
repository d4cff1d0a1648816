//! Global unit pools such as the ambulance fleet.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Units either available or out on dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    available: u32,
    #[serde(default)]
    dispatched: u32,
}

impl ResourcePool {
    pub fn new(available: u32) -> Self {
        Self {
            available,
            dispatched: 0,
        }
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    pub fn dispatched(&self) -> u32 {
        self.dispatched
    }

    pub fn total(&self) -> u32 {
        self.available + self.dispatched
    }

    /// Send up to `wanted` units, returning how many actually left.
    pub fn dispatch(&mut self, wanted: u32) -> u32 {
        let sent = wanted.min(self.available);
        self.available -= sent;
        self.dispatched += sent;
        debug!(sent, available = self.available, "Units dispatched from pool");
        sent
    }

    /// Return up to `count` dispatched units to service.
    pub fn release(&mut self, count: u32) -> u32 {
        let returned = count.min(self.dispatched);
        self.dispatched -= returned;
        self.available += returned;
        returned
    }
}
