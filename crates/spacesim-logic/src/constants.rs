//! Gameplay constants: compile-time defaults for every tunable.
//!
//! [`crate::config::SimConfig::default`] is built from these values; a
//! tuning file only needs to override the ones it changes.
//!
//! Times are milliseconds, matching the host's frame clock.

pub mod hull {
    pub const MAX_INTEGRITY: f32 = 100.0;
    pub const MAX_FUEL: f32 = 100.0;
    /// Above this the ship is overheating and takes continuous damage.
    pub const MAX_SAFE_TEMPERATURE: f32 = 50.0;
    /// Above this the ship is destroyed on its next update.
    pub const MAX_TEMPERATURE: f32 = 100.0;
    pub const COOLING_RATE_PER_SECOND: f32 = 2.5;
    pub const OVERHEAT_DAMAGE_PER_SECOND: f32 = 1.0;
    pub const DAMAGE_HISTORY_LEN: usize = 5;
    pub const SELF_DESTRUCT_STEPS: u32 = 3;
    pub const SELF_DESTRUCT_STEP_MS: f64 = 1000.0;
}

pub mod physics {
    /// Velocities are world units per step of this length.
    pub const STEP_MS: f64 = 1000.0 / 60.0;
}

pub mod ship {
    /// Collision radius of a ship body in world units.
    pub const RADIUS: f32 = 20.0;
    /// Divides projectile knockback.
    pub const MASS: f32 = 10.0;
    /// Gap between the hull edge and a freshly spawned projectile.
    pub const MUZZLE_GAP: f32 = 1.0;
}

pub mod ai {
    pub const WEAPONS_DELAY_PER_SHIP_MS: f64 = 50.0;
    pub const WEAPONS_JITTER_MS: f64 = 200.0;
    pub const THRUSTER_DELAY_PER_SHIP_MS: f64 = 10.0;
    pub const THRUSTER_JITTER_MS: f64 = 500.0;
    /// How long a sighting is remembered while the ship has an attacker.
    pub const AGGRO_MEMORY_MS: f64 = 60_000.0;
    /// How long a sighting is remembered otherwise.
    pub const IDLE_MEMORY_MS: f64 = 10_000.0;
    pub const AGGRO_VIEW_DISTANCE: f32 = 1000.0;
    pub const BASE_VIEW_DISTANCE: f32 = 1000.0;
    pub const VIEW_DISTANCE_PER_SHIP: f32 = 25.0;
    pub const MIN_VIEW_DISTANCE: f32 = 300.0;
    /// Half-angle of the forward view cone (radians, 60 degrees).
    pub const VIEW_HALF_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    /// Attempts at picking a walkable patrol tile before giving up this tick.
    pub const PATROL_PICK_ATTEMPTS: u32 = 8;
}

pub mod tiers {
    pub const MEDIUM_INTERVAL_MS: f64 = 1000.0 / 30.0;
    pub const LOW_INTERVAL_MS: f64 = 1000.0 / 15.0;
    pub const ULTRALOW_INTERVAL_MS: f64 = 1000.0;
}

pub mod score {
    pub const POINTS_PER_KILL: f32 = 1000.0;
}

pub mod supply {
    pub const RADIUS: f32 = 12.0;
}
