//! Propulsion system - turns enabled engines into velocity, fuel burn and heat.

use hecs::World;

use crate::components::{Body, Engine, Hull};

pub fn engine_system(world: &mut World, time: f64) {
    for (_, (body, engine, hull)) in world.query_mut::<(&mut Body, &mut Engine, &mut Hull)>() {
        if !body.active || hull.is_destroyed() {
            continue;
        }
        let Some(thrust) = engine.thrust(
            time,
            body.heading(),
            hull.remaining_fuel(),
            hull.is_overheating(),
        ) else {
            continue;
        };
        body.velocity += thrust.impulse;
        hull.reduce_fuel(thrust.fuel);
        hull.apply_heating(thrust.heat);
    }
}
