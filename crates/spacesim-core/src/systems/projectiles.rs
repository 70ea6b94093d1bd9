//! Projectile system - flight, expiry, wall hits and ship impacts.

use hecs::{Entity, World};
use spacesim_logic::damage::{DamageMetadata, ShipId};
use spacesim_logic::geometry::Vec2;
use spacesim_logic::level::Level;
use spacesim_logic::projectile::flight_steps;
use spacesim_logic::score::ScoreTracker;

use crate::components::{Body, Hull, Projectile, Ship};
use crate::events::{Outbox, SimEvent};

struct Target {
    entity: Entity,
    ship: ShipId,
    position: Vec2,
    radius: f32,
    mass: f32,
}

struct Impact {
    target: Entity,
    target_ship: ShipId,
    shooter: ShipId,
    damage: f32,
    heat: f32,
    knockback: Vec2,
}

pub fn projectile_system(
    world: &mut World,
    level: &dyn Level,
    time: f64,
    delta: f64,
    score: &mut ScoreTracker,
    outbox: &mut Outbox,
) {
    let targets: Vec<Target> = world
        .query::<(&Ship, &Body, &Hull)>()
        .iter()
        .filter(|(_, (_, body, hull))| body.active && !hull.is_destroyed())
        .map(|(entity, (ship, body, _))| Target {
            entity,
            ship: ship.id,
            position: body.position,
            radius: body.radius,
            mass: body.mass,
        })
        .collect();

    let mut spent: Vec<Entity> = Vec::new();
    let mut impacts: Vec<Impact> = Vec::new();

    let (steps, step_ms) = flight_steps(delta);

    'flight: for (entity, projectile) in world.query_mut::<&mut Projectile>() {
        if projectile.is_expired(time) {
            spent.push(entity);
            continue;
        }

        for _ in 0..steps {
            projectile.advance(step_ms);

            let on_floor = level
                .tile_at_world(projectile.position)
                .is_some_and(|tile| level.is_walkable(tile));
            if !on_floor {
                spent.push(entity);
                continue 'flight;
            }

            let hit = targets
                .iter()
                .find(|t| projectile.hits(t.ship, t.position, t.radius));
            if let Some(target) = hit {
                impacts.push(Impact {
                    target: target.entity,
                    target_ship: target.ship,
                    shooter: projectile.owner,
                    damage: projectile.damage,
                    heat: projectile.heat,
                    knockback: projectile.knockback(target.mass),
                });
                spent.push(entity);
                continue 'flight;
            }
        }
    }

    for impact in impacts {
        let Ok((body, hull)) = world.query_one_mut::<(&mut Body, &mut Hull)>(impact.target) else {
            continue;
        };
        // An earlier impact this tick may have finished the target off.
        if hull.is_destroyed() {
            continue;
        }
        let meta = DamageMetadata::new(impact.damage, time).from_attacker(impact.shooter);
        let events = hull.sustain_damage(meta);
        hull.apply_heating(impact.heat);
        body.velocity += impact.knockback;

        score.record_hit(impact.shooter, impact.target_ship, impact.damage, time);
        outbox.push(SimEvent::ProjectileHit {
            shooter: impact.shooter,
            target: impact.target_ship,
            damage: impact.damage,
        });
        outbox.hull(impact.target_ship, events);
    }

    for entity in spent {
        let _ = world.despawn(entity);
    }
}
