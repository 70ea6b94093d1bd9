//! Runtime-tunable simulation parameters.
//!
//! Every section is `#[serde(default)]`, so a tuning file only has to name
//! the values it overrides; everything else falls back to
//! [`crate::constants`]. Call [`SimConfig::validate`] after deserializing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ai, hull, ship, supply, tiers};

/// A tuning value that would break a simulation invariant.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid tuning value `{field}`: {reason}")]
pub struct InvalidTuning {
    pub field: &'static str,
    pub reason: &'static str,
}

/// Hull limits and passive behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HullTuning {
    pub max_integrity: f32,
    pub max_fuel: f32,
    pub max_safe_temperature: f32,
    pub max_temperature: f32,
    pub cooling_rate_per_second: f32,
    pub overheat_damage_per_second: f32,
    pub damage_history_len: usize,
    pub self_destruct_steps: u32,
    pub self_destruct_step_ms: f64,
}

impl Default for HullTuning {
    fn default() -> Self {
        Self {
            max_integrity: hull::MAX_INTEGRITY,
            max_fuel: hull::MAX_FUEL,
            max_safe_temperature: hull::MAX_SAFE_TEMPERATURE,
            max_temperature: hull::MAX_TEMPERATURE,
            cooling_rate_per_second: hull::COOLING_RATE_PER_SECOND,
            overheat_damage_per_second: hull::OVERHEAT_DAMAGE_PER_SECOND,
            damage_history_len: hull::DAMAGE_HISTORY_LEN,
            self_destruct_steps: hull::SELF_DESTRUCT_STEPS,
            self_destruct_step_ms: hull::SELF_DESTRUCT_STEP_MS,
        }
    }
}

/// AI pacing and perception.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiTuning {
    pub weapons_delay_per_ship_ms: f64,
    pub weapons_jitter_ms: f64,
    pub thruster_delay_per_ship_ms: f64,
    pub thruster_jitter_ms: f64,
    pub aggro_memory_ms: f64,
    pub idle_memory_ms: f64,
    pub aggro_view_distance: f32,
    pub base_view_distance: f32,
    pub view_distance_per_ship: f32,
    pub min_view_distance: f32,
    pub view_half_angle: f32,
    /// Minimum time between line-of-sight evaluations for the same target.
    pub sight_interval_ms: f64,
    pub patrol_pick_attempts: u32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            weapons_delay_per_ship_ms: ai::WEAPONS_DELAY_PER_SHIP_MS,
            weapons_jitter_ms: ai::WEAPONS_JITTER_MS,
            thruster_delay_per_ship_ms: ai::THRUSTER_DELAY_PER_SHIP_MS,
            thruster_jitter_ms: ai::THRUSTER_JITTER_MS,
            aggro_memory_ms: ai::AGGRO_MEMORY_MS,
            idle_memory_ms: ai::IDLE_MEMORY_MS,
            aggro_view_distance: ai::AGGRO_VIEW_DISTANCE,
            base_view_distance: ai::BASE_VIEW_DISTANCE,
            view_distance_per_ship: ai::VIEW_DISTANCE_PER_SHIP,
            min_view_distance: ai::MIN_VIEW_DISTANCE,
            view_half_angle: ai::VIEW_HALF_ANGLE,
            sight_interval_ms: tiers::LOW_INTERVAL_MS,
            patrol_pick_attempts: ai::PATROL_PICK_ATTEMPTS,
        }
    }
}

/// Accumulator intervals for the priority tiers. High runs every tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TierTuning {
    pub medium_interval_ms: f64,
    pub low_interval_ms: f64,
    pub ultralow_interval_ms: f64,
}

impl Default for TierTuning {
    fn default() -> Self {
        Self {
            medium_interval_ms: tiers::MEDIUM_INTERVAL_MS,
            low_interval_ms: tiers::LOW_INTERVAL_MS,
            ultralow_interval_ms: tiers::ULTRALOW_INTERVAL_MS,
        }
    }
}

/// Ship body dimensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyTuning {
    pub ship_radius: f32,
    pub ship_mass: f32,
    pub muzzle_gap: f32,
    pub supply_radius: f32,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            ship_radius: ship::RADIUS,
            ship_mass: ship::MASS,
            muzzle_gap: ship::MUZZLE_GAP,
            supply_radius: supply::RADIUS,
        }
    }
}

/// Everything the simulation context needs to know up front.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub hull: HullTuning,
    pub ai: AiTuning,
    pub tiers: TierTuning,
    pub body: BodyTuning,
}

impl SimConfig {
    /// Reject values that would make the clamps or timers meaningless.
    pub fn validate(&self) -> Result<(), InvalidTuning> {
        let h = &self.hull;
        if h.max_integrity <= 0.0 {
            return Err(invalid("hull.max_integrity", "must be positive"));
        }
        if h.max_fuel <= 0.0 {
            return Err(invalid("hull.max_fuel", "must be positive"));
        }
        if h.max_safe_temperature < 0.0 {
            return Err(invalid("hull.max_safe_temperature", "must not be negative"));
        }
        if h.max_temperature < h.max_safe_temperature {
            return Err(invalid(
                "hull.max_temperature",
                "must not be below max_safe_temperature",
            ));
        }
        if h.cooling_rate_per_second < 0.0 {
            return Err(invalid("hull.cooling_rate_per_second", "must not be negative"));
        }
        if h.damage_history_len == 0 {
            return Err(invalid("hull.damage_history_len", "must be at least 1"));
        }
        if h.self_destruct_step_ms <= 0.0 {
            return Err(invalid("hull.self_destruct_step_ms", "must be positive"));
        }

        let a = &self.ai;
        if a.weapons_jitter_ms < 0.0 || a.thruster_jitter_ms < 0.0 {
            return Err(invalid("ai.*_jitter_ms", "must not be negative"));
        }
        if a.min_view_distance < 0.0 || a.min_view_distance > a.base_view_distance {
            return Err(invalid(
                "ai.min_view_distance",
                "must be between 0 and base_view_distance",
            ));
        }
        if !(0.0..=std::f32::consts::PI).contains(&a.view_half_angle) {
            return Err(invalid("ai.view_half_angle", "must be within [0, PI]"));
        }

        let t = &self.tiers;
        if t.medium_interval_ms <= 0.0 || t.low_interval_ms <= 0.0 || t.ultralow_interval_ms <= 0.0
        {
            return Err(invalid("tiers.*_interval_ms", "must be positive"));
        }

        if self.body.ship_radius <= 0.0 {
            return Err(invalid("body.ship_radius", "must be positive"));
        }
        if self.body.ship_mass <= 0.0 {
            return Err(invalid("body.ship_mass", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> InvalidTuning {
    InvalidTuning { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_hard_cap_below_soft_cap_rejected() {
        let mut config = SimConfig::default();
        config.hull.max_temperature = 10.0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "hull.max_temperature");
    }

    #[test]
    fn test_min_view_above_base_rejected() {
        let mut config = SimConfig::default();
        config.ai.min_view_distance = 5000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_history_rejected() {
        let mut config = SimConfig::default();
        config.hull.damage_history_len = 0;
        assert!(config.validate().is_err());
    }
}
