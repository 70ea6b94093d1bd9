//! Projectiles fired by weapons.
//!
//! A projectile inherits its weapon's tuning at spawn time, flies in a
//! straight line, and is gone after its timeout or its first hit.

use serde::{Deserialize, Serialize};

use crate::attachments::WeaponParams;
use crate::constants::physics::STEP_MS;
use crate::damage::ShipId;
use crate::geometry::{circles_overlap, Vec2};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: ShipId,
    pub position: Vec2,
    /// World units per physics step.
    pub velocity: Vec2,
    pub damage: f32,
    pub force: f32,
    pub heat: f32,
    pub mass: f32,
    pub radius: f32,
    pub expires_at: f64,
}

/// Where the firing ship is when the trigger goes.
#[derive(Debug, Clone, Copy)]
pub struct Muzzle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub ship_radius: f32,
    pub gap: f32,
}

impl Projectile {
    /// Spawn just outside the hull along the heading, inheriting ship velocity.
    pub fn spawn(owner: ShipId, muzzle: Muzzle, params: &WeaponParams, time: f64) -> Self {
        let heading = Vec2::from_angle(muzzle.angle);
        let offset = muzzle.ship_radius + params.projectile_radius + muzzle.gap;
        Self {
            owner,
            position: muzzle.position + heading * offset,
            velocity: muzzle.velocity + heading * params.projectile_speed,
            damage: params.damage,
            force: params.force,
            heat: params.impact_heat,
            mass: params.projectile_mass,
            radius: params.projectile_radius,
            expires_at: time + params.projectile_timeout_ms,
        }
    }

    pub fn advance(&mut self, delta: f64) {
        let steps = (delta / STEP_MS) as f32;
        self.position += self.velocity * steps;
    }

    pub fn is_expired(&self, time: f64) -> bool {
        time >= self.expires_at
    }

    /// Overlap test against a ship; never hits its own firer.
    pub fn hits(&self, target: ShipId, position: Vec2, radius: f32) -> bool {
        target != self.owner && circles_overlap(self.position, self.radius, position, radius)
    }

    /// Velocity change handed to a target of `target_mass`.
    pub fn knockback(&self, target_mass: f32) -> Vec2 {
        if target_mass <= 0.0 {
            return Vec2::ZERO;
        }
        self.velocity.normalize() * (self.force * self.mass / target_mass)
    }
}

/// Split a tick into at most physics-step-sized slices so fast rounds are
/// tested for walls and ships along their path, not only where they land.
pub fn flight_steps(delta: f64) -> (usize, f64) {
    if delta <= 0.0 {
        return (1, 0.0);
    }
    let steps = (delta / STEP_MS).ceil().max(1.0);
    (steps as usize, delta / steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::WeaponKind;
    use approx::assert_abs_diff_eq;

    fn muzzle() -> Muzzle {
        Muzzle {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(1.0, 0.0),
            angle: 0.0,
            ship_radius: 20.0,
            gap: 1.0,
        }
    }

    #[test]
    fn test_spawn_offset_and_velocity() {
        let params = WeaponKind::Cannon.params();
        let p = Projectile::spawn(ShipId(1), muzzle(), &params, 500.0);
        assert_abs_diff_eq!(p.position.x, 100.0 + 20.0 + 5.0 + 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.position.y, 100.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.velocity.x, 1.0 + params.projectile_speed, epsilon = 1e-4);
        assert_eq!(p.expires_at, 500.0 + params.projectile_timeout_ms);
    }

    #[test]
    fn test_spawn_follows_heading() {
        let params = WeaponKind::MachineGun.params();
        let mut m = muzzle();
        m.angle = std::f32::consts::FRAC_PI_2;
        m.velocity = Vec2::ZERO;
        let p = Projectile::spawn(ShipId(1), m, &params, 0.0);
        assert_abs_diff_eq!(p.position.x, 100.0, epsilon = 1e-3);
        assert!(p.position.y > 100.0);
        assert!(p.velocity.y > 0.0);
    }

    #[test]
    fn test_never_hits_owner() {
        let params = WeaponKind::MachineGun.params();
        let p = Projectile::spawn(ShipId(1), muzzle(), &params, 0.0);
        assert!(!p.hits(ShipId(1), p.position, 20.0));
        assert!(p.hits(ShipId(2), p.position, 20.0));
    }

    #[test]
    fn test_expiry() {
        let params = WeaponKind::MachineGun.params();
        let p = Projectile::spawn(ShipId(1), muzzle(), &params, 0.0);
        assert!(!p.is_expired(params.projectile_timeout_ms - 1.0));
        assert!(p.is_expired(params.projectile_timeout_ms));
    }

    #[test]
    fn test_advance_one_step() {
        let params = WeaponKind::MachineGun.params();
        let mut p = Projectile::spawn(ShipId(1), muzzle(), &params, 0.0);
        let start = p.position;
        p.advance(STEP_MS);
        assert_abs_diff_eq!(p.position.x - start.x, p.velocity.x, epsilon = 1e-4);
    }

    #[test]
    fn test_flight_steps_slice_long_ticks() {
        assert_eq!(flight_steps(STEP_MS), (1, STEP_MS));
        assert_eq!(flight_steps(0.0), (1, 0.0));

        let (steps, step_ms) = flight_steps(100.0);
        assert_eq!(steps, 6);
        assert!(step_ms <= STEP_MS);
        assert_abs_diff_eq!(step_ms * steps as f64, 100.0, epsilon = 1e-9);
    }
}
