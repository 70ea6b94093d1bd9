//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities. Most of them are
//! the logic crate's own types (`Hull`, `Weapon`, `Engine`, `AiController`,
//! `Projectile`, `Supply`); this module adds the ones that only make sense
//! inside the world.
//!
//! | Entity | Components |
//! |--------|------------|
//! | ship | `Ship`, `Body`, `Hull`, `Pilot`, `Weapon`, `Engine`, optional `AiController` |
//! | projectile | `Projectile` |
//! | supply | `SupplyTag`, `Supply` |

mod ship;

pub use ship::*;

pub use spacesim_logic::ai::AiController;
pub use spacesim_logic::attachments::{Engine, Weapon};
pub use spacesim_logic::hull::Hull;
pub use spacesim_logic::projectile::Projectile;
pub use spacesim_logic::supply::Supply;
