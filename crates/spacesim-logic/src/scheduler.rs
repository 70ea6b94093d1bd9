//! Priority tiers for throttling work per tick.
//!
//! The simulation is driven once per host frame. Expensive work is bucketed
//! into tiers driven by elapsed-time accumulators, so it runs at a fixed
//! wall-clock rate no matter how fast frames arrive.
//!
//! | Tier | Rate | Used for |
//! |------|------|----------|
//! | `High` | every tick | movement, weapons, AI decisions |
//! | `Medium` | ~30 Hz | supply pickups |
//! | `Low` | ~15 Hz | line-of-sight refresh |
//! | `UltraLow` | ~1 Hz | score snapshots |

use serde::{Deserialize, Serialize};

use crate::config::TierTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    High,
    Medium,
    Low,
    UltraLow,
}

/// Accumulates elapsed time and fires once per interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickTimer {
    interval_ms: f64,
    accumulated: f64,
}

impl TickTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            accumulated: 0.0,
        }
    }

    /// Add `delta` and report whether an interval elapsed. Leftover time
    /// carries over; a long frame fires once, not once per missed interval.
    pub fn tick(&mut self, delta: f64) -> bool {
        self.accumulated += delta;
        if self.accumulated >= self.interval_ms {
            self.accumulated %= self.interval_ms.max(f64::EPSILON);
            true
        } else {
            false
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

/// Which tiers are due this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueTiers {
    pub medium: bool,
    pub low: bool,
    pub ultralow: bool,
}

impl DueTiers {
    pub fn is_due(&self, tier: PriorityTier) -> bool {
        match tier {
            PriorityTier::High => true,
            PriorityTier::Medium => self.medium,
            PriorityTier::Low => self.low,
            PriorityTier::UltraLow => self.ultralow,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierSchedule {
    medium: TickTimer,
    low: TickTimer,
    ultralow: TickTimer,
}

impl TierSchedule {
    pub fn new(tuning: &TierTuning) -> Self {
        Self {
            medium: TickTimer::new(tuning.medium_interval_ms),
            low: TickTimer::new(tuning.low_interval_ms),
            ultralow: TickTimer::new(tuning.ultralow_interval_ms),
        }
    }

    pub fn advance(&mut self, delta: f64) -> DueTiers {
        DueTiers {
            medium: self.medium.tick(delta),
            low: self.low.tick(delta),
            ultralow: self.ultralow.tick(delta),
        }
    }
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self::new(&TierTuning::default())
    }
}

/// Rate limiter keyed on absolute time rather than accumulated deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Throttle {
    interval_ms: f64,
    last: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    /// True on the first call and then at most once per interval.
    pub fn ready(&mut self, time: f64) -> bool {
        match self.last {
            Some(last) if time - last < self.interval_ms => false,
            _ => {
                self.last = Some(time);
                true
            }
        }
    }
}
