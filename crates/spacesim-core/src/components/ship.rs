//! Ship and pickup components.

use serde::{Deserialize, Serialize};
use spacesim_logic::damage::ShipId;
use spacesim_logic::geometry::Vec2;

/// Identity of a ship entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    /// Player name; the leaderboard groups by it.
    pub name: String,
}

/// Physical state of a ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Body {
    pub position: Vec2,
    /// World units per physics step.
    pub velocity: Vec2,
    /// Radians, 0 faces +x.
    pub angle: f32,
    pub radius: f32,
    pub mass: f32,
    /// Inactive bodies are neither simulated nor targeted.
    pub active: bool,
}

impl Body {
    pub fn new(position: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            angle: 0.0,
            radius,
            mass,
            active: true,
        }
    }

    pub fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }
}

/// Who issues commands for a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pilot {
    /// Commands arrive only through the command queue.
    Player,
    /// An `AiController` component drives the ship.
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SupplyId(pub u32);

/// Tags a supply entity with its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyTag {
    pub id: SupplyId,
}
