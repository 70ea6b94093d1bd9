//! Supply system - ships collect pickups they overlap.

use hecs::{Entity, World};

use crate::components::{Body, Hull, Ship, Supply, SupplyTag, Weapon};
use crate::events::{Outbox, SimEvent};

pub fn supply_system(world: &mut World, outbox: &mut Outbox) {
    let mut available: Vec<(Entity, SupplyTag, Supply)> = world
        .query::<(&SupplyTag, &Supply)>()
        .iter()
        .map(|(entity, (tag, supply))| (entity, *tag, supply.clone()))
        .collect();
    if available.is_empty() {
        return;
    }

    let mut taken: Vec<Entity> = Vec::new();

    for (_, (ship, body, hull, mut weapon)) in
        world.query_mut::<(&Ship, &Body, &mut Hull, Option<&mut Weapon>)>()
    {
        if !body.active {
            continue;
        }
        let mut i = 0;
        while i < available.len() {
            let (entity, tag, supply) = &available[i];
            if supply.touches(body.position, body.radius)
                && supply.apply(hull, weapon.as_deref_mut())
            {
                log::debug!("{} collected {:?} supply {}", ship.id, supply.kind, tag.id.0);
                outbox.push(SimEvent::SupplyCollected {
                    ship: ship.id,
                    supply: tag.id,
                    kind: supply.kind,
                });
                taken.push(*entity);
                available.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    for entity in taken {
        let _ = world.despawn(entity);
    }
}
