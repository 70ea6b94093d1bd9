//! SpaceSim Headless Combat Harness
//!
//! Runs scripted combat scenarios against the logic and engine crates
//! without a renderer or network. Ends with an AI-only skirmish on the
//! bundled arena and prints its leaderboard.
//!
//! Usage:
//!   cargo run -p spacesim-simtest
//!   cargo run -p spacesim-simtest -- --verbose --seed 7
//!   cargo run -p spacesim-simtest -- --config my_tuning.json --duration-ms 120000
//!   cargo run -p spacesim-simtest -- --json > report.json

use clap::Parser;
use serde::Serialize;
use spacesim_core::config::{self, ConfigError};
use spacesim_core::prelude::*;
use spacesim_core::relay::{NetEvent, RelayError, StaleFilter, Stamper};
use spacesim_logic::ai::AiState;
use spacesim_logic::attachments::{FireRefusal, Weapon, WeaponKind};
use spacesim_logic::config::SimConfig;
use spacesim_logic::constants::physics::STEP_MS;
use spacesim_logic::damage::{DamageHistory, DamageMetadata, DamageRecord, ShipId};
use spacesim_logic::geometry::Vec2;
use spacesim_logic::hull::{Hull, HullEvent};
use spacesim_logic::level::{GridLevel, RoomRect};
use spacesim_logic::score::{LeaderboardEntry, ScoreTracker};
use spacesim_logic::supply::SupplyKind;
use std::path::PathBuf;

// ── Bundled data (same files a host would ship) ─────────────────────────
const TUNING_JSON: &str = include_str!("../../../data/tuning.json");
const ARENA_JSON: &str = include_str!("../../../data/arena.json");

#[derive(Debug, Parser)]
#[command(name = "spacesim-simtest", about = "Headless combat harness for SpaceSim")]
struct Args {
    /// Print per-scenario detail
    #[arg(short, long)]
    verbose: bool,
    /// Emit a JSON report on stdout instead of the text summary
    #[arg(long)]
    json: bool,
    /// RNG seed for the engine
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Tuning file to use instead of the bundled one
    #[arg(long)]
    config: Option<PathBuf>,
    /// Level file to use instead of the bundled arena
    #[arg(long)]
    level: Option<PathBuf>,
    /// Simulated length of the skirmish
    #[arg(long, default_value_t = 60_000.0)]
    duration_ms: f64,
}

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct Report {
    seed: u64,
    passed: usize,
    failed: usize,
    results: Vec<TestResult>,
    leaderboard: Vec<LeaderboardEntry>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let (tuning, arena) = match load_data(&args) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let verbose = args.verbose && !args.json;
    if !args.json {
        println!("=== SpaceSim Combat Harness (seed {}) ===\n", args.seed);
    }

    let mut results = Vec::new();

    // 1. Hull resource clamps and destruction
    results.extend(validate_hull(verbose));

    // 2. Weapon fire gate
    results.extend(validate_weapons(verbose));

    // 3. Damage history and scoring
    results.extend(validate_scoring(verbose));

    // 4. AI perception through the engine
    results.extend(validate_ai(&tuning, args.seed, verbose));

    // 5. Projectile duel
    results.extend(validate_duel(&tuning, args.seed, verbose));

    // 6. Supplies and relay input
    results.extend(validate_supplies_and_relay(&tuning, args.seed, verbose));

    // 7. AI skirmish on the arena
    let (skirmish, leaderboard) = run_skirmish(&tuning, arena, &args, verbose);
    results.extend(skirmish);

    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    if args.json {
        let report = Report {
            seed: args.seed,
            passed,
            failed,
            results,
            leaderboard,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: cannot encode report: {err}");
                std::process::exit(2);
            }
        }
    } else {
        // ── Summary ──
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if verbose || !r.passed {
                println!("  {} {} - {}", icon, r.name, r.detail);
            } else {
                println!("  {} {}", icon, r.name);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed,
            passed + failed,
            failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_data(args: &Args) -> Result<(SimConfig, GridLevel), ConfigError> {
    let tuning = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::parse_config(TUNING_JSON)?,
    };
    let arena = match &args.level {
        Some(path) => config::load_level(path)?,
        None => config::parse_level(ARENA_JSON)?,
    };
    Ok((tuning, arena))
}

fn open_level() -> GridLevel {
    GridLevel::open(40, 20, 20.0).with_room(RoomRect::new(1, 0, 0, 40, 20))
}

fn run_ticks(engine: &mut SimulationEngine, ticks: usize) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        engine.update(STEP_MS);
        events.extend(engine.drain_events());
    }
    events
}

fn destroyed_count(events: &[HullEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, HullEvent::Destroyed { .. }))
        .count()
}

// ── 1. Hull ─────────────────────────────────────────────────────────────

fn validate_hull(verbose: bool) -> Vec<TestResult> {
    section(verbose, "--- Hull ---");
    let mut results = Vec::new();

    let mut hull = Hull::default();
    hull.repair(50.0);
    hull.add_fuel(500.0);
    hull.reduce_fuel(30.0);
    hull.reduce_fuel(500.0);
    hull.apply_cooling(25.0);
    results.push(TestResult {
        name: "hull_clamps".into(),
        passed: hull.integrity() == 100.0
            && hull.remaining_fuel() == 0.0
            && hull.temperature() == 0.0,
        detail: format!(
            "integrity={} fuel={} temperature={}",
            hull.integrity(),
            hull.remaining_fuel(),
            hull.temperature()
        ),
    });

    let mut hull = Hull::default();
    let mut events = Vec::new();
    for i in 0..4 {
        events.extend(hull.sustain_damage(DamageMetadata::new(40.0, i as f64)));
    }
    results.push(TestResult {
        name: "hull_destroyed_once".into(),
        passed: hull.integrity() == 0.0 && destroyed_count(&events) == 1,
        detail: format!(
            "4 x 40 damage → integrity {}, {} destroy event(s)",
            hull.integrity(),
            destroyed_count(&events)
        ),
    });

    let mut hull = Hull::default();
    hull.apply_heating(60.0);
    hull.apply_heating(60.0);
    let before = hull.is_destroyed();
    let events = hull.update(STEP_MS, STEP_MS);
    results.push(TestResult {
        name: "hull_overheat_destroys".into(),
        passed: !before && hull.is_destroyed() && destroyed_count(&events) == 1,
        detail: format!("heated to {} → destroyed on next update", hull.temperature()),
    });

    let mut hull = Hull::default();
    hull.apply_heating(80.0);
    let mut time = 0.0;
    for _ in 0..60 {
        time += STEP_MS;
        hull.update(time, STEP_MS);
    }
    let lost = 100.0 - hull.integrity();
    results.push(TestResult {
        name: "hull_overheat_bleeds".into(),
        passed: lost > 0.0 && lost < 1.5,
        detail: format!("1s above safe temperature → {lost:.3} integrity lost"),
    });

    let mut hull = Hull::default();
    hull.self_destruct(0.0);
    let mut time = 0.0;
    let mut destroyed = 0;
    while time < 10_000.0 {
        time += STEP_MS;
        destroyed += destroyed_count(&hull.update(time, STEP_MS));
    }
    results.push(TestResult {
        name: "hull_self_destruct".into(),
        passed: hull.is_destroyed() && destroyed == 1,
        detail: format!("countdown finished, {destroyed} destroy event(s)"),
    });

    results
}

// ── 2. Weapons ──────────────────────────────────────────────────────────

fn validate_weapons(verbose: bool) -> Vec<TestResult> {
    section(verbose, "--- Weapons ---");
    let mut results = Vec::new();

    for &kind in WeaponKind::all() {
        let mut weapon = Weapon::new(kind);
        weapon.enabled = true;
        let delay = weapon.params.firing_delay_ms;
        let first = weapon.fire(0.0, false).is_ok();
        let early = weapon.fire(delay - 1.0, false);
        let hot = weapon.fire(delay, true);
        let later = weapon.fire(delay, false).is_ok();
        weapon.ammo = 0;
        let empty = weapon.fire(delay * 10.0, false);

        results.push(TestResult {
            name: format!("weapon_gate_{kind:?}").to_lowercase(),
            passed: first
                && early == Err(FireRefusal::CoolingDown)
                && hot == Err(FireRefusal::Overheating)
                && later
                && empty == Err(FireRefusal::OutOfAmmo),
            detail: format!("delay {delay}ms, {} rounds", kind.params().ammo),
        });
    }

    results
}

// ── 3. Scoring ──────────────────────────────────────────────────────────

fn validate_scoring(verbose: bool) -> Vec<TestResult> {
    section(verbose, "--- Scoring ---");
    let mut results = Vec::new();

    let mut history = DamageHistory::new();
    for (i, attacker) in [1, 2, 1].into_iter().enumerate() {
        history.push(DamageRecord {
            timestamp: i as f64,
            attacker_id: Some(ShipId(attacker)),
            message: None,
        });
    }
    results.push(TestResult {
        name: "attacker_skips_latest".into(),
        passed: history.last_attacker() == Some(ShipId(2))
            && history.most_recent_attacker() == Some(ShipId(1)),
        detail: format!(
            "[1,2,1] → last_attacker {:?}, most recent {:?}",
            history.last_attacker(),
            history.most_recent_attacker()
        ),
    });

    let mut score = ScoreTracker::new();
    let ace = ShipId(1);
    score.start(ace, "ace", 0.0);
    for i in 0..4 {
        score.record_shot(ace);
        if i % 2 == 0 {
            score.record_hit(ace, ShipId(2), 10.0, i as f64);
        }
    }
    let accuracy = score.get(ace).map_or(-1.0, |s| s.accuracy());
    results.push(TestResult {
        name: "score_accuracy".into(),
        passed: accuracy == 50.0,
        detail: format!("2 of 4 shots landed → {accuracy}%"),
    });

    score.record_kill(ace, ShipId(2), 5.0);
    score.stop(ace, 10.0);
    score.record_shot(ace);
    let stats = score.get(ace);
    results.push(TestResult {
        name: "score_stopped_record_frozen".into(),
        passed: stats.is_some_and(|s| s.shots_fired == 4 && !s.is_running()),
        detail: "shots after stop are ignored".into(),
    });

    let board = score.leaderboard(10.0);
    results.push(TestResult {
        name: "score_leaderboard".into(),
        passed: board.len() == 1 && board[0].kills == 1,
        detail: format!("{board:?}"),
    });

    results
}

// ── 4. AI ───────────────────────────────────────────────────────────────

fn validate_ai(tuning: &SimConfig, seed: u64, verbose: bool) -> Vec<TestResult> {
    section(verbose, "--- AI ---");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::new(tuning.clone(), open_level(), seed);
    let bot = engine.spawn_ship(ShipSpawn::ai("bot", Vec2::new(100.0, 200.0)));
    engine.spawn_ship(ShipSpawn::player("target", Vec2::new(400.0, 200.0)));
    engine.drain_events();

    let events = run_ticks(&mut engine, 1);
    let engaged = events.contains(&SimEvent::AiStateChanged {
        ship: bot,
        from: AiState::Patrolling,
        to: AiState::Attacking,
    });
    let fired = events
        .iter()
        .any(|e| matches!(e, SimEvent::ProjectileFired { ship, .. } if *ship == bot));
    results.push(TestResult {
        name: "ai_engages_visible_enemy".into(),
        passed: engaged && fired,
        detail: format!("state after first tick: {:?}", engine.ai_state(bot)),
    });

    run_ticks(&mut engine, 1);
    results.push(TestResult {
        name: "ai_chases_while_reloading".into(),
        passed: engine.ai_state(bot) == Some(AiState::Chasing),
        detail: format!("state after second tick: {:?}", engine.ai_state(bot)),
    });

    let mut engine = SimulationEngine::new(tuning.clone(), open_level(), seed);
    let bot = engine.spawn_ship(ShipSpawn::ai("bot", Vec2::new(400.0, 200.0)));
    engine.spawn_ship(ShipSpawn::player("sneaky", Vec2::new(100.0, 200.0)));
    run_ticks(&mut engine, 1);
    results.push(TestResult {
        name: "ai_blind_behind".into(),
        passed: engine.ai_state(bot) == Some(AiState::Patrolling),
        detail: "enemy behind the view cone stays unseen".into(),
    });

    results
}

// ── 5. Duel ─────────────────────────────────────────────────────────────

fn validate_duel(tuning: &SimConfig, seed: u64, verbose: bool) -> Vec<TestResult> {
    section(verbose, "--- Duel ---");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::new(tuning.clone(), open_level(), seed);
    let gunner = engine.spawn_ship(
        ShipSpawn::player("gunner", Vec2::new(100.0, 200.0)).with_weapon(WeaponKind::Cannon),
    );
    let target = engine.spawn_ship(ShipSpawn::player("target", Vec2::new(300.0, 200.0)));
    engine.sustain_damage(target, DamageMetadata::new(90.0, 0.0));

    engine.submit(gunner, Command::SetWeaponEnabled(true));
    let mut events = run_ticks(&mut engine, 1);
    engine.submit(gunner, Command::SetWeaponEnabled(false));
    events.extend(run_ticks(&mut engine, 60));

    let hit = events.iter().any(|e| {
        matches!(
            e,
            SimEvent::ProjectileHit { shooter, target: t, .. } if *shooter == gunner && *t == target
        )
    });
    results.push(TestResult {
        name: "duel_projectile_hits".into(),
        passed: hit,
        detail: "cannon round reaches a ship 200 units ahead".into(),
    });

    let killer = events.iter().find_map(|e| match e {
        SimEvent::ShipDestroyed { ship, killer, .. } if *ship == target => Some(*killer),
        _ => None,
    });
    results.push(TestResult {
        name: "duel_kill_credited".into(),
        passed: killer == Some(Some(gunner)) && engine.ship(target).is_none(),
        detail: format!("killer {killer:?}"),
    });

    let kills = engine
        .leaderboard()
        .into_iter()
        .find(|e| e.ship == gunner)
        .map_or(0, |e| e.kills);
    results.push(TestResult {
        name: "duel_score".into(),
        passed: kills == 1,
        detail: format!("gunner kills: {kills}"),
    });

    results
}

// ── 6. Supplies & relay ─────────────────────────────────────────────────

fn validate_supplies_and_relay(tuning: &SimConfig, seed: u64, verbose: bool) -> Vec<TestResult> {
    section(verbose, "--- Supplies & Relay ---");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::new(tuning.clone(), open_level(), seed);
    let ship = engine.spawn_ship(ShipSpawn::player("ace", Vec2::new(200.0, 200.0)));
    engine.reduce_fuel(ship, 60.0);
    engine.spawn_supply(SupplyKind::Fuel, 25.0, Vec2::new(210.0, 200.0));
    run_ticks(&mut engine, 4);
    let fuel = engine.ship(ship).map_or(0.0, |s| s.fuel);
    results.push(TestResult {
        name: "supply_refuels".into(),
        passed: fuel == 65.0 && engine.supplies().is_empty(),
        detail: format!("fuel after pickup: {fuel}"),
    });

    let mut stamper = Stamper::new();
    let mut filter = StaleFilter::new();
    let wires: Result<Vec<String>, RelayError> = [0.25, 1.25]
        .into_iter()
        .map(|angle| stamper.encode(NetEvent::SetAngle { ship, angle }))
        .collect();
    let mut dropped = 0;
    if let Ok(wires) = wires {
        for wire in wires.iter().rev() {
            match filter.decode(wire) {
                Ok(envelope) => {
                    if let Some((id, command)) = envelope.event.to_command() {
                        engine.submit(id, command);
                    }
                }
                Err(RelayError::Stale { .. }) => dropped += 1,
                Err(err) => log::warn!("relay decode failed: {err}"),
            }
        }
    }
    run_ticks(&mut engine, 1);
    let angle = engine.ship(ship).map_or(0.0, |s| s.angle);
    results.push(TestResult {
        name: "relay_drops_stale".into(),
        passed: dropped == 1 && angle == 1.25,
        detail: format!("{dropped} stale message(s), angle {angle}"),
    });

    results
}

// ── 7. Skirmish ─────────────────────────────────────────────────────────

fn run_skirmish(
    tuning: &SimConfig,
    arena: GridLevel,
    args: &Args,
    verbose: bool,
) -> (Vec<TestResult>, Vec<LeaderboardEntry>) {
    section(verbose, "--- Skirmish ---");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::new(tuning.clone(), arena, args.seed);
    let spawns = [
        ("red", Vec2::new(100.0, 100.0), WeaponKind::MachineGun, 0.0),
        ("blue", Vec2::new(700.0, 100.0), WeaponKind::Cannon, std::f32::consts::PI),
        ("green", Vec2::new(100.0, 300.0), WeaponKind::PlasmaGun, 0.0),
        ("gold", Vec2::new(700.0, 300.0), WeaponKind::MachineGun, std::f32::consts::PI),
    ];
    for (name, position, weapon, angle) in spawns {
        engine.spawn_ship(ShipSpawn::ai(name, position).with_weapon(weapon).facing(angle));
    }
    for i in 0..3 {
        let kind = [SupplyKind::Fuel, SupplyKind::Ammo, SupplyKind::Repair][i];
        engine.spawn_supply(kind, 25.0, Vec2::new(300.0 + 100.0 * i as f32, 200.0));
    }

    let mut shots = 0usize;
    let mut hits = 0usize;
    let mut deaths = 0usize;
    let mut clamped = true;
    while engine.time() < args.duration_ms && engine.ship_count() > 1 {
        engine.update(STEP_MS);
        for event in engine.drain_events() {
            match event {
                SimEvent::ProjectileFired { .. } => shots += 1,
                SimEvent::ProjectileHit { .. } => hits += 1,
                SimEvent::ShipDestroyed { ref snapshot, killer, .. } => {
                    deaths += 1;
                    if verbose {
                        println!("  {} destroyed by {:?}", snapshot.name, killer);
                    }
                }
                _ => {}
            }
        }
        clamped &= engine.ships().iter().all(|s| {
            (0.0..=tuning.hull.max_integrity).contains(&s.integrity)
                && (0.0..=tuning.hull.max_fuel).contains(&s.fuel)
                && s.temperature >= 0.0
        });
    }

    results.push(TestResult {
        name: "skirmish_resources_clamped".into(),
        passed: clamped,
        detail: format!("{:.0}ms simulated", engine.time()),
    });
    results.push(TestResult {
        name: "skirmish_hits_le_shots".into(),
        passed: hits <= shots,
        detail: format!("{shots} shots, {hits} hits, {deaths} deaths"),
    });

    let leaderboard = engine.leaderboard();
    let fired: u32 = engine.score().iter().map(|s| s.shots_fired).sum();
    results.push(TestResult {
        name: "skirmish_score_matches_events".into(),
        passed: fired as usize == shots && leaderboard.len() == 4,
        detail: format!("tracker counted {fired} shots"),
    });

    if verbose {
        for (rank, entry) in leaderboard.iter().enumerate() {
            println!(
                "  #{} {:<6} score {:>7.1} accuracy {:>5.1}% kills {}",
                rank + 1,
                entry.name,
                entry.score,
                entry.accuracy,
                entry.kills
            );
        }
    }

    (results, leaderboard)
}

fn section(verbose: bool, header: &str) {
    if verbose {
        println!("{header}");
    }
}
