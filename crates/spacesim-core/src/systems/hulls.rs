//! Hull system - heat, overheat damage, cooling and self-destruct countdowns.

use hecs::World;

use crate::components::{Hull, Ship};
use crate::events::Outbox;

pub fn hull_system(world: &mut World, time: f64, delta: f64, outbox: &mut Outbox) {
    for (_, (ship, hull)) in world.query_mut::<(&Ship, &mut Hull)>() {
        let events = hull.update(time, delta);
        outbox.hull(ship.id, events);
    }
}
