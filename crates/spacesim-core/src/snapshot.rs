//! Read-only views of world entities.

use hecs::{Entity, World};

use crate::components::{AiController, Body, Engine, Hull, Pilot, Ship, Supply, SupplyTag, Weapon};
use crate::events::{ShipSnapshot, SupplySnapshot};

pub fn snapshot_ship(world: &World, entity: Entity) -> Option<ShipSnapshot> {
    let mut query = world
        .query_one::<(
            &Ship,
            &Body,
            &Hull,
            &Pilot,
            Option<&Weapon>,
            Option<&Engine>,
            Option<&AiController>,
        )>(entity)
        .ok()?;
    let (ship, body, hull, pilot, weapon, engine, ai) = query.get()?;
    Some(ShipSnapshot {
        id: ship.id,
        name: ship.name.clone(),
        pilot: *pilot,
        position: body.position,
        velocity: body.velocity,
        angle: body.angle,
        active: body.active,
        integrity: hull.integrity(),
        fuel: hull.remaining_fuel(),
        temperature: hull.temperature(),
        overheating: hull.is_overheating(),
        destroyed: hull.is_destroyed(),
        weapon: weapon.map(|w| w.kind),
        weapon_enabled: weapon.is_some_and(|w| w.enabled),
        ammo: weapon.map_or(0, |w| w.ammo),
        engine: engine.map(|e| e.kind),
        engine_enabled: engine.is_some_and(|e| e.enabled),
        ai_state: ai.map(|a| a.state()),
    })
}

pub fn snapshot_supplies(world: &World) -> Vec<SupplySnapshot> {
    let mut supplies: Vec<SupplySnapshot> = world
        .query::<(&SupplyTag, &Supply)>()
        .iter()
        .map(|(_, (tag, supply))| SupplySnapshot {
            id: tag.id,
            kind: supply.kind,
            amount: supply.amount,
            position: supply.position,
        })
        .collect();
    supplies.sort_by_key(|s| s.id);
    supplies
}
