//! Wall clock and dice for the live world.
//!
//! The clock stamps mob deaths and shouts; the random source rolls loot
//! drops and mints mob, battle and shout identifiers.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Wall clock in UTC.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Thread-local RNG for loot rolls, v4 UUIDs for identifiers.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    /// Inclusive on both ends, so a drop roll over `1..=10_000` can hit
    /// either bound.
    fn gen_range(&self, min: u32, max: u32) -> u32 {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Every loot roll returns the same value; UUIDs stay unique.
#[cfg(test)]
pub struct FixedRandom(pub u32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, _min: u32, _max: u32) -> u32 {
        self.0
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}
