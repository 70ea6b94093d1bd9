//! SpaceSim Core - Combat Simulation Engine
//!
//! An ECS-based simulation of a top-down space dogfight: player and AI
//! ships with resource-limited hulls, weapons and engines, projectiles,
//! supply pickups and a score tracker.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: ships, projectiles, supplies
//! - **Components**: Pure data attached to entities (Body, Hull, Weapon, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! All state lives in one [`engine::SimulationEngine`]. Input goes in as
//! [`events::Command`]s and comes out as [`events::SimEvent`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use spacesim_core::prelude::*;
//! use spacesim_logic::config::SimConfig;
//! use spacesim_logic::geometry::Vec2;
//! use spacesim_logic::level::{GridLevel, RoomRect};
//!
//! let level = GridLevel::open(40, 20, 20.0).with_room(RoomRect::new(1, 0, 0, 40, 20));
//! let mut engine = SimulationEngine::new(SimConfig::default(), level, 7);
//!
//! let me = engine.spawn_ship(ShipSpawn::player("me", Vec2::new(100.0, 100.0)));
//! engine.spawn_ship(ShipSpawn::ai("bot", Vec2::new(600.0, 100.0)));
//! engine.submit(me, Command::SetWeaponEnabled(true));
//!
//! loop {
//!     engine.update(1000.0 / 60.0); // 60 FPS
//!     for event in engine.drain_events() {
//!         println!("{event:?}");
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod events;
pub mod relay;
pub mod snapshot;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{ShipSpawn, SimulationEngine};
    pub use crate::events::{Command, ShipSnapshot, SimEvent};
}
