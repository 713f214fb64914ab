//! Power Grid
//!
//! Tracks total consumption against capacity. Going over capacity is a
//! blackout; dropping back under restores power.

use super::oracles::PowerOracle;

/// Default grid capacity (kW)
pub const DEFAULT_CAPACITY: i64 = 500;

#[derive(Debug, Clone)]
pub struct PowerGrid {
    consumption: i64,
    capacity: i64,
    powered: bool,
}

impl Default for PowerGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PowerGrid {
    pub fn new(capacity: i64) -> Self {
        Self {
            consumption: 0,
            capacity,
            powered: true,
        }
    }

    pub fn consumption(&self) -> i64 {
        self.consumption
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    pub fn upgrade_capacity(&mut self, amount: i64) {
        self.capacity += amount;
        self.update_state();
    }

    fn update_state(&mut self) {
        let should_be_on = self.consumption <= self.capacity;
        if should_be_on != self.powered {
            self.powered = should_be_on;
            if should_be_on {
                log::info!("[Power] Power restored ({}/{} kW)", self.consumption, self.capacity);
            } else {
                log::warn!("[Power] BLACKOUT ({}/{} kW)", self.consumption, self.capacity);
            }
        }
    }
}

impl PowerOracle for PowerGrid {
    fn register_consumer(&mut self, amount: i64) {
        self.consumption += amount;
        self.update_state();
        log::debug!("[Power] Consumption {}/{} kW", self.consumption, self.capacity);
    }

    fn unregister_consumer(&mut self, amount: i64) {
        self.consumption = (self.consumption - amount).max(0);
        self.update_state();
    }
}
