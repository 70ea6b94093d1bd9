//! Command application and net-change event emission.

use hecs::{Entity, World};
use spacesim_logic::damage::ShipId;
use spacesim_logic::geometry::normalize_angle;

use crate::components::{Body, Engine, Hull, Ship, Weapon};
use crate::events::{Command, Outbox, SimEvent};

/// Control surfaces of one ship at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    pub ship: ShipId,
    pub angle: f32,
    pub weapon_enabled: bool,
    pub engine_enabled: bool,
}

pub fn capture_controls(world: &World) -> Vec<(Entity, ControlState)> {
    world
        .query::<(&Ship, &Body, Option<&Weapon>, Option<&Engine>)>()
        .iter()
        .map(|(entity, (ship, body, weapon, engine))| {
            (
                entity,
                ControlState {
                    ship: ship.id,
                    angle: body.angle,
                    weapon_enabled: weapon.is_some_and(|w| w.enabled),
                    engine_enabled: engine.is_some_and(|e| e.enabled),
                },
            )
        })
        .collect()
}

/// Apply one command. Toggle and angle changes are not reported here;
/// [`emit_control_changes`] reports the net result once per tick.
pub fn apply_command(
    world: &mut World,
    entity: Entity,
    command: Command,
    time: f64,
    outbox: &mut Outbox,
) {
    let Ok((ship, body, hull, weapon, engine)) = world.query_one_mut::<(
        &Ship,
        &mut Body,
        &mut Hull,
        Option<&mut Weapon>,
        Option<&mut Engine>,
    )>(entity) else {
        return;
    };

    // A wreck can still be switched off, nothing else.
    let dead = hull.is_destroyed() || !body.active;

    match command {
        Command::SetAngle(angle) if !dead => body.angle = normalize_angle(angle),
        Command::SetWeaponEnabled(on) if !dead || !on => {
            if let Some(weapon) = weapon {
                weapon.enabled = on;
            }
        }
        Command::SetEngineEnabled(on) if !dead || !on => {
            if let Some(engine) = engine {
                engine.enabled = on;
            }
        }
        Command::SelfDestruct if !dead => {
            log::info!("{} self-destruct armed", ship.id);
            outbox.hull(ship.id, hull.self_destruct(time));
        }
        Command::CancelSelfDestruct => outbox.hull(ship.id, hull.cancel_self_destruct()),
        _ => log::trace!("{} ignored {:?} on wreck", ship.id, command),
    }
}

/// Compare against the start-of-tick state and report what changed.
pub fn emit_control_changes(world: &World, before: &[(Entity, ControlState)], outbox: &mut Outbox) {
    for (entity, was) in before {
        let Ok(mut query) =
            world.query_one::<(&Body, Option<&Weapon>, Option<&Engine>)>(*entity)
        else {
            continue;
        };
        let Some((body, weapon, engine)) = query.get() else {
            continue;
        };

        if body.angle != was.angle {
            outbox.push(SimEvent::ShipAngleChanged {
                ship: was.ship,
                angle: body.angle,
            });
        }
        let weapon_enabled = weapon.is_some_and(|w| w.enabled);
        if weapon_enabled != was.weapon_enabled {
            outbox.push(SimEvent::WeaponChanged {
                ship: was.ship,
                enabled: weapon_enabled,
            });
        }
        let engine_enabled = engine.is_some_and(|e| e.enabled);
        if engine_enabled != was.engine_enabled {
            outbox.push(SimEvent::EngineChanged {
                ship: was.ship,
                enabled: engine_enabled,
            });
        }
    }
}
