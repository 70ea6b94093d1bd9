//! AI system - runs every AI pilot against a snapshot of the scene.

use hecs::{Entity, World};
use rand::Rng;
use spacesim_logic::ai::{AiCommand, AiPerception, ShipView};
use spacesim_logic::level::Level;

use crate::components::{AiController, Body, Engine, Hull, Ship, Weapon};
use crate::events::{Command, Outbox, SimEvent};

use super::control::apply_command;

/// Decide for every AI ship, then apply the resulting commands through the
/// regular command path.
pub fn ai_system<R: Rng>(
    world: &mut World,
    level: &dyn Level,
    time: f64,
    rng: &mut R,
    outbox: &mut Outbox,
) {
    let views: Vec<ShipView> = world
        .query::<(&Ship, &Body, &Hull)>()
        .iter()
        .map(|(_, (ship, body, hull))| ShipView {
            id: ship.id,
            position: body.position,
            angle: body.angle,
            active: body.active && !hull.is_destroyed(),
        })
        .collect();

    let mut decisions: Vec<(Entity, Vec<AiCommand>)> = Vec::new();

    for (entity, (ship, body, hull, weapon, engine, ai)) in world.query_mut::<(
        &Ship,
        &Body,
        &Hull,
        Option<&Weapon>,
        Option<&Engine>,
        &mut AiController,
    )>() {
        let perception = AiPerception {
            time,
            me: ShipView {
                id: ship.id,
                position: body.position,
                angle: body.angle,
                active: body.active && !hull.is_destroyed(),
            },
            weapon_enabled: weapon.is_some_and(|w| w.enabled),
            engine_enabled: engine.is_some_and(|e| e.enabled),
            damage: hull.damage_history(),
            ships: &views,
        };

        let before = ai.state();
        let commands = ai.update(&perception, level, rng);
        if ai.state() != before {
            outbox.push(SimEvent::AiStateChanged {
                ship: ship.id,
                from: before,
                to: ai.state(),
            });
        }
        if !commands.is_empty() {
            decisions.push((entity, commands));
        }
    }

    for (entity, commands) in decisions {
        for command in commands {
            apply_command(world, entity, Command::from(command), time, outbox);
        }
    }
}
