//! Floating pickups that top up fuel, ammo, or integrity.

use serde::{Deserialize, Serialize};

use crate::attachments::Weapon;
use crate::geometry::{circles_overlap, Vec2};
use crate::hull::Hull;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplyKind {
    Fuel,
    Ammo,
    Repair,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    pub kind: SupplyKind,
    /// Fuel units, rounds (truncated), or integrity points.
    pub amount: f32,
    pub position: Vec2,
    pub radius: f32,
}

impl Supply {
    pub fn new(kind: SupplyKind, amount: f32, position: Vec2, radius: f32) -> Self {
        Self {
            kind,
            amount: amount.max(0.0),
            position,
            radius,
        }
    }

    pub fn touches(&self, position: Vec2, radius: f32) -> bool {
        circles_overlap(self.position, self.radius, position, radius)
    }

    /// Hand the contents to a ship. Returns false when the ship cannot take
    /// it (destroyed, or ammo for a ship with no weapon); the supply stays.
    pub fn apply(&self, hull: &mut Hull, weapon: Option<&mut Weapon>) -> bool {
        if hull.is_destroyed() {
            return false;
        }
        match self.kind {
            SupplyKind::Fuel => hull.add_fuel(self.amount),
            SupplyKind::Repair => hull.repair(self.amount),
            SupplyKind::Ammo => match weapon {
                Some(weapon) => weapon.add_ammo(self.amount as u32),
                None => return false,
            },
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::WeaponKind;
    use crate::damage::DamageMetadata;

    #[test]
    fn test_fuel_clamped() {
        let mut hull = Hull::default();
        hull.reduce_fuel(30.0);
        let supply = Supply::new(SupplyKind::Fuel, 50.0, Vec2::ZERO, 12.0);
        assert!(supply.apply(&mut hull, None));
        assert_eq!(hull.remaining_fuel(), 100.0);
    }

    #[test]
    fn test_repair() {
        let mut hull = Hull::default();
        hull.sustain_damage(DamageMetadata::new(40.0, 0.0));
        Supply::new(SupplyKind::Repair, 25.0, Vec2::ZERO, 12.0).apply(&mut hull, None);
        assert_eq!(hull.integrity(), 85.0);
    }

    #[test]
    fn test_ammo_needs_weapon() {
        let mut hull = Hull::default();
        let supply = Supply::new(SupplyKind::Ammo, 20.0, Vec2::ZERO, 12.0);
        assert!(!supply.apply(&mut hull, None));

        let mut weapon = Weapon::new(WeaponKind::Cannon);
        let before = weapon.ammo;
        assert!(supply.apply(&mut hull, Some(&mut weapon)));
        assert_eq!(weapon.ammo, before + 20);
    }

    #[test]
    fn test_destroyed_ship_cannot_collect() {
        let mut hull = Hull::default();
        hull.sustain_damage(DamageMetadata::new(500.0, 0.0));
        let supply = Supply::new(SupplyKind::Repair, 25.0, Vec2::ZERO, 12.0);
        assert!(!supply.apply(&mut hull, None));
        assert_eq!(hull.integrity(), 0.0);
    }

    #[test]
    fn test_touches() {
        let supply = Supply::new(SupplyKind::Fuel, 10.0, Vec2::new(100.0, 0.0), 12.0);
        assert!(supply.touches(Vec2::new(70.0, 0.0), 20.0));
        assert!(!supply.touches(Vec2::new(50.0, 0.0), 20.0));
    }
}
