//! End-to-end combat scenarios through the simulation engine.
//!
//! Exercises: spawn → commands → AI → weapons → projectiles → damage
//! → death → score, plus supplies and relay input.

use approx::assert_relative_eq;
use rstest::rstest;
use spacesim_core::prelude::*;
use spacesim_core::relay::{NetEvent, StaleFilter, Stamper};
use spacesim_logic::ai::AiState;
use spacesim_logic::attachments::WeaponKind;
use spacesim_logic::config::SimConfig;
use spacesim_logic::constants::physics::STEP_MS;
use spacesim_logic::damage::DamageMetadata;
use spacesim_logic::geometry::Vec2;
use spacesim_logic::hull::DestroyCause;
use spacesim_logic::level::{GridLevel, RoomRect};
use spacesim_logic::supply::SupplyKind;

// ── Helpers ────────────────────────────────────────────────────────────

fn arena() -> GridLevel {
    GridLevel::open(40, 20, 20.0).with_room(RoomRect::new(1, 0, 0, 40, 20))
}

fn engine() -> SimulationEngine {
    SimulationEngine::new(SimConfig::default(), arena(), 1234)
}

fn run(engine: &mut SimulationEngine, ticks: usize) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        engine.update(STEP_MS);
        events.extend(engine.drain_events());
    }
    events
}

/// Fire exactly one shot from `ship`.
fn single_shot(
    engine: &mut SimulationEngine,
    ship: spacesim_logic::damage::ShipId,
) -> Vec<SimEvent> {
    engine.submit(ship, Command::SetWeaponEnabled(true));
    let mut events = run(engine, 1);
    engine.submit(ship, Command::SetWeaponEnabled(false));
    events.extend(run(engine, 1));
    events
}

// ── AI ─────────────────────────────────────────────────────────────────

#[test]
fn test_ai_engages_visible_enemy_on_first_tick() {
    let mut engine = engine();
    let bot = engine.spawn_ship(ShipSpawn::ai("bot", Vec2::new(100.0, 200.0)));
    engine.spawn_ship(ShipSpawn::player("target", Vec2::new(400.0, 200.0)));
    engine.drain_events();

    let events = run(&mut engine, 1);
    let state = engine.ai_state(bot).unwrap();
    assert!(matches!(state, AiState::Attacking | AiState::Chasing));
    assert!(events.contains(&SimEvent::AiStateChanged {
        ship: bot,
        from: AiState::Patrolling,
        to: AiState::Attacking,
    }));
    assert!(events.contains(&SimEvent::WeaponChanged {
        ship: bot,
        enabled: true,
    }));
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::ProjectileFired { ship, .. } if *ship == bot)));
}

#[test]
fn test_ai_stops_firing_and_chases_while_reloading() {
    let mut engine = engine();
    let bot = engine.spawn_ship(ShipSpawn::ai("bot", Vec2::new(100.0, 200.0)));
    engine.spawn_ship(ShipSpawn::player("target", Vec2::new(400.0, 200.0)));
    run(&mut engine, 1);

    let events = run(&mut engine, 1);
    assert_eq!(engine.ai_state(bot), Some(AiState::Chasing));
    assert!(events.contains(&SimEvent::WeaponChanged {
        ship: bot,
        enabled: false,
    }));
    assert!(events.contains(&SimEvent::EngineChanged {
        ship: bot,
        enabled: true,
    }));
}

#[test]
fn test_ai_ignores_enemy_behind_it() {
    let mut engine = engine();
    let bot = engine.spawn_ship(ShipSpawn::ai("bot", Vec2::new(400.0, 200.0)));
    engine.spawn_ship(ShipSpawn::player("sneaky", Vec2::new(100.0, 200.0)));

    run(&mut engine, 1);
    assert_eq!(engine.ai_state(bot), Some(AiState::Patrolling));
}

#[test]
fn test_dead_ship_untracked_by_ai() {
    let mut engine = engine();
    engine.spawn_ship(ShipSpawn::ai("bot", Vec2::new(100.0, 200.0)));
    let victim = engine.spawn_ship(ShipSpawn::player("victim", Vec2::new(100.0, 350.0)));

    engine.sustain_damage(victim, DamageMetadata::new(500.0, 0.0));
    run(&mut engine, 1);

    assert!(engine.ship(victim).is_none());
    for (_, (_, ai)) in engine.world.query::<(&Ship, &AiController)>().iter() {
        assert!(!ai.tracked_enemies().contains(&victim));
    }
}

// ── Projectiles ────────────────────────────────────────────────────────

#[test]
fn test_cannon_hit_damages_heats_and_pushes_target() {
    let mut engine = engine();
    let a = engine.spawn_ship(
        ShipSpawn::player("gunner", Vec2::new(100.0, 200.0)).with_weapon(WeaponKind::Cannon),
    );
    let b = engine.spawn_ship(ShipSpawn::player("target", Vec2::new(300.0, 200.0)));

    let mut events = single_shot(&mut engine, a);
    events.extend(run(&mut engine, 40));

    assert!(events.contains(&SimEvent::ProjectileHit {
        shooter: a,
        target: b,
        damage: 12.0,
    }));
    let target = engine.ship(b).unwrap();
    assert_eq!(target.integrity, 88.0);
    assert!(target.velocity.x > 0.0);
    assert_eq!(engine.projectile_count(), 0);

    let stats = engine.score().get(a).unwrap();
    assert_eq!(stats.shots_fired, 1);
    assert_eq!(stats.landed_shots(), 1);
    assert_eq!(stats.accuracy(), 100.0);
    assert_eq!(engine.ship(a).unwrap().ammo, WeaponKind::Cannon.params().ammo - 1);
}

#[rstest]
#[case(WeaponKind::MachineGun)]
#[case(WeaponKind::Cannon)]
#[case(WeaponKind::PlasmaGun)]
fn test_hit_applies_weapon_params(#[case] kind: WeaponKind) {
    let mut engine = engine();
    let a = engine
        .spawn_ship(ShipSpawn::player("gunner", Vec2::new(100.0, 200.0)).with_weapon(kind));
    let b = engine.spawn_ship(ShipSpawn::player("target", Vec2::new(300.0, 200.0)));
    let params = kind.params();

    single_shot(&mut engine, a);
    run(&mut engine, 40);

    let target = engine.ship(b).unwrap();
    assert_relative_eq!(target.integrity, 100.0 - params.damage);
    assert_relative_eq!(
        target.velocity.x,
        params.force * params.projectile_mass / engine.config().body.ship_mass,
        epsilon = 1e-5
    );
    assert_eq!(target.velocity.y, 0.0);
    assert_eq!(engine.ship(a).unwrap().ammo, params.ammo - 1);
}

#[test]
fn test_lethal_hit_credits_shooter() {
    let mut engine = engine();
    let a = engine.spawn_ship(
        ShipSpawn::player("gunner", Vec2::new(100.0, 200.0)).with_weapon(WeaponKind::Cannon),
    );
    let b = engine.spawn_ship(ShipSpawn::player("target", Vec2::new(300.0, 200.0)));
    engine.sustain_damage(b, DamageMetadata::new(90.0, 0.0));

    let mut events = single_shot(&mut engine, a);
    events.extend(run(&mut engine, 40));

    let deaths: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::ShipDestroyed {
                ship,
                cause,
                killer,
                ..
            } => Some((*ship, *cause, *killer)),
            _ => None,
        })
        .collect();
    assert_eq!(deaths, vec![(b, DestroyCause::IntegrityDepleted, Some(a))]);

    let board = engine.leaderboard();
    assert_eq!(board[0].name, "gunner");
    assert_eq!(board[0].score, 1100.0);
    assert_eq!(board[0].kills, 1);
}

#[test]
fn test_wreck_absorbs_no_extra_hits() {
    let mut engine = engine();
    let a = engine.spawn_ship(
        ShipSpawn::player("left", Vec2::new(100.0, 200.0)).with_weapon(WeaponKind::Cannon),
    );
    let b = engine.spawn_ship(
        ShipSpawn::player("right", Vec2::new(500.0, 200.0))
            .with_weapon(WeaponKind::Cannon)
            .facing(std::f32::consts::PI),
    );
    let target = engine.spawn_ship(ShipSpawn::player("target", Vec2::new(300.0, 200.0)));
    engine.sustain_damage(target, DamageMetadata::new(90.0, 0.0));

    engine.submit(a, Command::SetWeaponEnabled(true));
    engine.submit(b, Command::SetWeaponEnabled(true));
    let mut events = run(&mut engine, 1);
    engine.submit(a, Command::SetWeaponEnabled(false));
    engine.submit(b, Command::SetWeaponEnabled(false));
    events.extend(run(&mut engine, 40));

    let hits = events
        .iter()
        .filter(|e| matches!(e, SimEvent::ProjectileHit { target: t, .. } if *t == target))
        .count();
    assert_eq!(hits, 1);
    assert!(engine.ship(target).is_none());
    assert_eq!(engine.projectile_count(), 0);

    let landed: usize = [a, b]
        .iter()
        .map(|&id| engine.score().get(id).unwrap().landed_shots())
        .sum();
    assert_eq!(landed, 1);
}

#[test]
fn test_fast_round_hits_on_long_ticks() {
    let mut engine = engine();
    let a = engine.spawn_ship(
        ShipSpawn::player("gunner", Vec2::new(100.0, 200.0)).with_weapon(WeaponKind::MachineGun),
    );
    let b = engine.spawn_ship(ShipSpawn::player("target", Vec2::new(300.0, 200.0)));

    // 100 ms ticks move a machine-gun round 72 units, wider than the target.
    engine.submit(a, Command::SetWeaponEnabled(true));
    engine.update(100.0);
    let mut events = engine.drain_events();
    engine.submit(a, Command::SetWeaponEnabled(false));
    for _ in 0..6 {
        engine.update(100.0);
        events.extend(engine.drain_events());
    }

    assert!(events.contains(&SimEvent::ProjectileHit {
        shooter: a,
        target: b,
        damage: WeaponKind::MachineGun.params().damage,
    }));
    assert_eq!(engine.ship(b).unwrap().integrity, 98.0);
}

#[test]
fn test_projectile_dies_on_wall() {
    let level = GridLevel::from_ascii(
        "####################
         #.........#........#
         #.........#........#
         #.........#........#
         ####################",
        20.0,
    )
    .unwrap();
    let mut engine = SimulationEngine::new(SimConfig::default(), level, 1);
    let a = engine.spawn_ship(ShipSpawn::player("gunner", Vec2::new(100.0, 50.0)));

    single_shot(&mut engine, a);
    assert_eq!(engine.projectile_count(), 1);
    run(&mut engine, 15);
    assert_eq!(engine.projectile_count(), 0);
}

// ── Supplies ───────────────────────────────────────────────────────────

#[test]
fn test_supply_collected_on_overlap() {
    let mut engine = engine();
    let a = engine.spawn_ship(ShipSpawn::player("ace", Vec2::new(200.0, 200.0)));
    engine.reduce_fuel(a, 60.0);
    let fuel = engine.spawn_supply(SupplyKind::Fuel, 25.0, Vec2::new(210.0, 200.0));
    engine.spawn_supply(SupplyKind::Repair, 25.0, Vec2::new(700.0, 300.0));

    let events = run(&mut engine, 4);
    assert!(events.contains(&SimEvent::SupplyCollected {
        ship: a,
        supply: fuel,
        kind: SupplyKind::Fuel,
    }));
    assert_eq!(engine.ship(a).unwrap().fuel, 65.0);
    assert_eq!(engine.supplies().len(), 1);
}

// ── Relay ──────────────────────────────────────────────────────────────

#[test]
fn test_relay_input_drives_ship() {
    let mut engine = engine();
    let a = engine.spawn_ship(ShipSpawn::player("remote", Vec2::new(200.0, 200.0)));

    let mut stamper = Stamper::new();
    let mut filter = StaleFilter::new();
    let old = stamper
        .encode(NetEvent::SetAngle { ship: a, angle: 0.25 })
        .unwrap();
    let new = stamper
        .encode(NetEvent::SetAngle { ship: a, angle: 1.25 })
        .unwrap();

    for wire in [new, old] {
        let Ok(envelope) = filter.decode(&wire) else {
            continue;
        };
        if let Some((ship, command)) = envelope.event.to_command() {
            engine.submit(ship, command);
        }
    }
    run(&mut engine, 1);
    assert_eq!(engine.ship(a).unwrap().angle, 1.25);
}
