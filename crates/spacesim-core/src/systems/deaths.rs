//! Death system - resolves destroyed hulls into removal, kill credit and events.

use hecs::{Entity, World};
use spacesim_logic::damage::ShipId;
use spacesim_logic::score::ScoreTracker;
use std::collections::HashMap;

use crate::components::{AiController, Hull};
use crate::events::{Outbox, SimEvent};
use crate::snapshot::snapshot_ship;

/// Remove every ship queued in `outbox.deaths`.
///
/// The kill goes to the newest damage record with an attacker. The dead
/// ship's score record is stopped and every AI stops tracking it.
pub fn death_system(
    world: &mut World,
    ships: &mut HashMap<ShipId, Entity>,
    score: &mut ScoreTracker,
    time: f64,
    outbox: &mut Outbox,
) {
    let deaths = std::mem::take(&mut outbox.deaths);
    for (id, cause) in deaths {
        let Some(entity) = ships.remove(&id) else {
            continue;
        };
        let Some(snapshot) = snapshot_ship(world, entity) else {
            continue;
        };
        let killer = world
            .get::<&Hull>(entity)
            .ok()
            .and_then(|hull| hull.damage_history().most_recent_attacker())
            .filter(|killer| *killer != id);

        score.snapshot(id, snapshot.ammo, snapshot.integrity, snapshot.fuel);
        if let Some(killer) = killer {
            score.record_kill(killer, id, time);
        }
        score.stop(id, time);

        log::info!(
            "{} ({}) destroyed: {:?}, killer {:?}",
            id,
            snapshot.name,
            cause,
            killer
        );

        let _ = world.despawn(entity);
        for (_, ai) in world.query_mut::<&mut AiController>() {
            ai.untrack_enemy(id);
        }

        outbox.push(SimEvent::ShipDestroyed {
            ship: id,
            cause,
            killer,
            snapshot: Box::new(snapshot),
        });
    }
}
