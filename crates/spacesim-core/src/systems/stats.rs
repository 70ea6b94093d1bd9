//! Stats system - periodic resource snapshots into the score tracker.

use hecs::World;
use spacesim_logic::score::ScoreTracker;

use crate::components::{Hull, Ship, Weapon};

pub fn stats_system(world: &World, score: &mut ScoreTracker) {
    for (_, (ship, hull, weapon)) in world.query::<(&Ship, &Hull, Option<&Weapon>)>().iter() {
        score.snapshot(
            ship.id,
            weapon.map_or(0, |w| w.ammo),
            hull.integrity(),
            hull.remaining_fuel(),
        );
    }
}
