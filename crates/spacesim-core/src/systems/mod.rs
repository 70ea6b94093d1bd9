//! Systems - logic that operates on components
//!
//! Each system is a free function over the `hecs::World` plus whatever
//! shared state it needs. [`crate::engine::SimulationEngine::update`] calls
//! them in a fixed order.

mod ai;
mod control;
mod deaths;
mod hulls;
mod movement;
mod projectiles;
mod propulsion;
mod stats;
mod supplies;
mod weapons;

pub use ai::*;
pub use control::*;
pub use deaths::*;
pub use hulls::*;
pub use movement::*;
pub use projectiles::*;
pub use propulsion::*;
pub use stats::*;
pub use supplies::*;
pub use weapons::*;
