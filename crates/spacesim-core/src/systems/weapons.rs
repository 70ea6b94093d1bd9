//! Weapon system - fires enabled weapons and spawns their projectiles.

use hecs::World;
use spacesim_logic::attachments::FireRefusal;
use spacesim_logic::config::BodyTuning;
use spacesim_logic::projectile::{Muzzle, Projectile};
use spacesim_logic::score::ScoreTracker;

use crate::components::{Body, Hull, Ship, Weapon};
use crate::events::{Outbox, SimEvent};

pub fn weapon_system(
    world: &mut World,
    time: f64,
    body_tuning: &BodyTuning,
    score: &mut ScoreTracker,
    outbox: &mut Outbox,
) {
    let mut spawned: Vec<Projectile> = Vec::new();

    for (_, (ship, body, weapon, hull)) in
        world.query_mut::<(&Ship, &Body, &mut Weapon, &mut Hull)>()
    {
        if !body.active || hull.is_destroyed() {
            continue;
        }
        let heat = match weapon.fire(time, hull.is_overheating()) {
            Ok(heat) => heat,
            Err(FireRefusal::Disabled) | Err(FireRefusal::CoolingDown) => continue,
            Err(refusal) => {
                log::trace!("{} cannot fire: {:?}", ship.id, refusal);
                continue;
            }
        };
        hull.apply_heating(heat);

        let muzzle = Muzzle {
            position: body.position,
            velocity: body.velocity,
            angle: body.angle,
            ship_radius: body.radius,
            gap: body_tuning.muzzle_gap,
        };
        let projectile = Projectile::spawn(ship.id, muzzle, &weapon.params, time);
        score.record_shot(ship.id);
        outbox.push(SimEvent::ProjectileFired {
            ship: ship.id,
            weapon: weapon.kind,
            position: projectile.position,
            velocity: projectile.velocity,
        });
        spawned.push(projectile);
    }

    for projectile in spawned {
        world.spawn((projectile,));
    }
}
