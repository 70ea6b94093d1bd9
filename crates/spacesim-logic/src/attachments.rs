//! Weapon and engine attachments.
//!
//! Each attachment is a kind tag plus a parameter struct; the presets live
//! in [`WeaponKind::params`] / [`EngineKind::params`] rather than in one
//! type per preset. Both are cooldown-gated against the frame clock.
//!
//! | Weapon | Delay | Damage | Heat/shot | Ammo |
//! |--------|-------|--------|-----------|------|
//! | `MachineGun` | 100 ms | 2 | 1.0 | 500 |
//! | `Cannon` | 800 ms | 12 | 6.0 | 40 |
//! | `PlasmaGun` | 300 ms | 6 | 3.0 | 150 |

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    MachineGun,
    Cannon,
    PlasmaGun,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponParams {
    pub firing_delay_ms: f64,
    pub ammo: u32,
    pub damage: f32,
    /// Impulse handed to whatever the projectile hits.
    pub force: f32,
    /// Heat added to the firing ship per shot.
    pub heat_per_shot: f32,
    /// Heat added to the ship that gets hit.
    pub impact_heat: f32,
    pub projectile_mass: f32,
    pub projectile_radius: f32,
    pub projectile_speed: f32,
    pub projectile_timeout_ms: f64,
}

impl WeaponKind {
    pub fn all() -> &'static [WeaponKind] {
        &[WeaponKind::MachineGun, WeaponKind::Cannon, WeaponKind::PlasmaGun]
    }

    pub fn params(self) -> WeaponParams {
        match self {
            WeaponKind::MachineGun => WeaponParams {
                firing_delay_ms: 100.0,
                ammo: 500,
                damage: 2.0,
                force: 0.5,
                heat_per_shot: 1.0,
                impact_heat: 0.5,
                projectile_mass: 0.1,
                projectile_radius: 2.0,
                projectile_speed: 12.0,
                projectile_timeout_ms: 1500.0,
            },
            WeaponKind::Cannon => WeaponParams {
                firing_delay_ms: 800.0,
                ammo: 40,
                damage: 12.0,
                force: 4.0,
                heat_per_shot: 6.0,
                impact_heat: 3.0,
                projectile_mass: 1.0,
                projectile_radius: 5.0,
                projectile_speed: 8.0,
                projectile_timeout_ms: 2500.0,
            },
            WeaponKind::PlasmaGun => WeaponParams {
                firing_delay_ms: 300.0,
                ammo: 150,
                damage: 6.0,
                force: 1.0,
                heat_per_shot: 3.0,
                impact_heat: 8.0,
                projectile_mass: 0.3,
                projectile_radius: 3.0,
                projectile_speed: 10.0,
                projectile_timeout_ms: 2000.0,
            },
        }
    }
}

/// Why a trigger pull did not produce a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireRefusal {
    Disabled,
    OutOfAmmo,
    CoolingDown,
    Overheating,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub params: WeaponParams,
    pub ammo: u32,
    pub enabled: bool,
    last_fired: Option<f64>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self::with_params(kind, kind.params())
    }

    pub fn with_params(kind: WeaponKind, params: WeaponParams) -> Self {
        Self {
            kind,
            params,
            ammo: params.ammo,
            enabled: false,
            last_fired: None,
        }
    }

    pub fn last_fired(&self) -> Option<f64> {
        self.last_fired
    }

    /// Gate check without side effects.
    pub fn check_fire(&self, time: f64, overheating: bool) -> Result<(), FireRefusal> {
        if !self.enabled {
            return Err(FireRefusal::Disabled);
        }
        if self.ammo == 0 {
            return Err(FireRefusal::OutOfAmmo);
        }
        if let Some(last) = self.last_fired {
            if time < last + self.params.firing_delay_ms {
                return Err(FireRefusal::CoolingDown);
            }
        }
        if overheating {
            return Err(FireRefusal::Overheating);
        }
        Ok(())
    }

    pub fn can_fire(&self, time: f64, overheating: bool) -> bool {
        self.check_fire(time, overheating).is_ok()
    }

    /// Consume a round if the gate allows. Returns the heat the shot adds to
    /// the firing hull.
    pub fn fire(&mut self, time: f64, overheating: bool) -> Result<f32, FireRefusal> {
        self.check_fire(time, overheating)?;
        self.ammo -= 1;
        self.last_fired = Some(time);
        Ok(self.params.heat_per_shot)
    }

    pub fn add_ammo(&mut self, rounds: u32) {
        self.ammo = self.ammo.saturating_add(rounds);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    Economy,
    Standard,
    Sports,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Velocity added per use, along the heading.
    pub force: f32,
    pub fuel_per_use: f32,
    pub heat_per_use: f32,
    pub usage_delay_ms: f64,
}

impl EngineKind {
    pub fn all() -> &'static [EngineKind] {
        &[EngineKind::Economy, EngineKind::Standard, EngineKind::Sports]
    }

    pub fn params(self) -> EngineParams {
        match self {
            EngineKind::Economy => EngineParams {
                force: 0.05,
                fuel_per_use: 0.01,
                heat_per_use: 0.05,
                usage_delay_ms: 25.0,
            },
            EngineKind::Standard => EngineParams {
                force: 0.1,
                fuel_per_use: 0.025,
                heat_per_use: 0.1,
                usage_delay_ms: 20.0,
            },
            EngineKind::Sports => EngineParams {
                force: 0.2,
                fuel_per_use: 0.05,
                heat_per_use: 0.25,
                usage_delay_ms: 15.0,
            },
        }
    }
}

/// What one engine use costs the hull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thrust {
    pub impulse: Vec2,
    pub fuel: f32,
    pub heat: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    pub kind: EngineKind,
    pub params: EngineParams,
    pub enabled: bool,
    last_used: Option<f64>,
}

impl Engine {
    pub fn new(kind: EngineKind) -> Self {
        Self {
            kind,
            params: kind.params(),
            enabled: false,
            last_used: None,
        }
    }

    pub fn can_thrust(&self, time: f64, fuel: f32, overheating: bool) -> bool {
        if !self.enabled || fuel <= 0.0 || overheating {
            return false;
        }
        match self.last_used {
            Some(last) => time >= last + self.params.usage_delay_ms,
            None => true,
        }
    }

    /// Use the engine along `heading` (unit vector) if the gate allows.
    pub fn thrust(
        &mut self,
        time: f64,
        heading: Vec2,
        fuel: f32,
        overheating: bool,
    ) -> Option<Thrust> {
        if !self.can_thrust(time, fuel, overheating) {
            return None;
        }
        self.last_used = Some(time);
        Some(Thrust {
            impulse: heading * self.params.force,
            fuel: self.params.fuel_per_use,
            heat: self.params.heat_per_use,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn armed(kind: WeaponKind) -> Weapon {
        let mut w = Weapon::new(kind);
        w.enabled = true;
        w
    }

    #[rstest]
    #[case(WeaponKind::MachineGun)]
    #[case(WeaponKind::Cannon)]
    #[case(WeaponKind::PlasmaGun)]
    fn test_first_shot_allowed(#[case] kind: WeaponKind) {
        let mut w = armed(kind);
        let heat = w.fire(0.0, false).unwrap();
        assert_eq!(heat, kind.params().heat_per_shot);
        assert_eq!(w.ammo, kind.params().ammo - 1);
    }

    #[test]
    fn test_refused_when_disabled() {
        let w = Weapon::new(WeaponKind::Cannon);
        assert_eq!(w.check_fire(0.0, false), Err(FireRefusal::Disabled));
    }

    #[test]
    fn test_refused_without_ammo() {
        let mut w = armed(WeaponKind::Cannon);
        w.ammo = 0;
        assert_eq!(w.check_fire(0.0, false), Err(FireRefusal::OutOfAmmo));
    }

    #[test]
    fn test_refused_while_overheating() {
        let w = armed(WeaponKind::Cannon);
        assert_eq!(w.check_fire(0.0, true), Err(FireRefusal::Overheating));
    }

    #[test]
    fn test_cooldown_boundary() {
        let mut w = armed(WeaponKind::Cannon);
        w.fire(1000.0, false).unwrap();
        assert_eq!(w.check_fire(1799.0, false), Err(FireRefusal::CoolingDown));
        assert!(w.can_fire(1800.0, false));
    }

    #[test]
    fn test_engine_gate() {
        let mut e = Engine::new(EngineKind::Standard);
        assert!(e.thrust(0.0, Vec2::new(1.0, 0.0), 10.0, false).is_none());
        e.enabled = true;
        assert!(e.thrust(0.0, Vec2::new(1.0, 0.0), 0.0, false).is_none());
        assert!(e.thrust(0.0, Vec2::new(1.0, 0.0), 10.0, true).is_none());

        let t = e.thrust(0.0, Vec2::new(1.0, 0.0), 10.0, false).unwrap();
        assert_eq!(t.impulse, Vec2::new(0.1, 0.0));
        assert!(e.thrust(10.0, Vec2::new(1.0, 0.0), 10.0, false).is_none());
        assert!(e.thrust(20.0, Vec2::new(1.0, 0.0), 10.0, false).is_some());
    }

    #[test]
    fn test_sports_engine_stronger_than_economy() {
        assert!(EngineKind::Sports.params().force > EngineKind::Economy.params().force);
        assert!(
            EngineKind::Sports.params().heat_per_use > EngineKind::Economy.params().heat_per_use
        );
    }
}
