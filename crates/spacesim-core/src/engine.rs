//! Simulation engine - main entry point for running the simulation

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use spacesim_logic::ai::AiState;
use spacesim_logic::attachments::{EngineKind, WeaponKind};
use spacesim_logic::config::SimConfig;
use spacesim_logic::damage::{DamageMetadata, ShipId};
use spacesim_logic::geometry::{normalize_angle, Vec2};
use spacesim_logic::level::Level;
use spacesim_logic::scheduler::TierSchedule;
use spacesim_logic::score::{LeaderboardEntry, ScoreTracker};
use spacesim_logic::supply::SupplyKind;
use std::collections::{HashMap, VecDeque};

use crate::components::*;
use crate::events::{Command, Outbox, ShipSnapshot, SimEvent, SupplySnapshot};
use crate::snapshot::{snapshot_ship, snapshot_supplies};
use crate::systems::*;

/// How to spawn a ship.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipSpawn {
    pub name: String,
    pub position: Vec2,
    pub angle: f32,
    pub weapon: WeaponKind,
    pub engine: EngineKind,
    pub pilot: Pilot,
}

impl ShipSpawn {
    /// A player ship with a machine gun and a standard engine.
    pub fn player(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            name: name.into(),
            position,
            angle: 0.0,
            weapon: WeaponKind::MachineGun,
            engine: EngineKind::Standard,
            pilot: Pilot::Player,
        }
    }

    pub fn ai(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            pilot: Pilot::Ai,
            ..Self::player(name, position)
        }
    }

    pub fn with_weapon(mut self, weapon: WeaponKind) -> Self {
        self.weapon = weapon;
        self
    }

    pub fn with_engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    pub fn facing(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }
}

/// Main simulation engine
///
/// Owns every ship, projectile and supply plus the level, the score
/// tracker and both message queues. The host calls [`update`] once per
/// frame with the elapsed milliseconds and then drains events.
///
/// [`update`]: SimulationEngine::update
pub struct SimulationEngine {
    /// ECS world containing all entities
    pub world: World,
    level: Box<dyn Level>,
    config: SimConfig,
    ships: HashMap<ShipId, Entity>,
    next_ship_id: u32,
    next_supply_id: u32,
    score: ScoreTracker,
    commands: VecDeque<(ShipId, Command)>,
    outbox: Outbox,
    schedule: TierSchedule,
    /// Simulation time in milliseconds since start
    time: f64,
    rng: StdRng,
}

impl SimulationEngine {
    /// Create an empty simulation over `level`.
    ///
    /// `config` is used as given; validate it first (the loaders in
    /// [`crate::config`] do).
    pub fn new(config: SimConfig, level: impl Level + 'static, seed: u64) -> Self {
        Self {
            world: World::new(),
            level: Box::new(level),
            schedule: TierSchedule::new(&config.tiers),
            config,
            ships: HashMap::new(),
            next_ship_id: 1,
            next_supply_id: 1,
            score: ScoreTracker::new(),
            commands: VecDeque::new(),
            outbox: Outbox::default(),
            time: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn level(&self) -> &dyn Level {
        self.level.as_ref()
    }

    /// Simulation time in milliseconds
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.score.leaderboard(self.time)
    }

    /// Add a ship. AI pilots start out tracking every ship already in the
    /// scene, and every existing AI starts tracking the newcomer.
    pub fn spawn_ship(&mut self, spawn: ShipSpawn) -> ShipId {
        let id = ShipId(self.next_ship_id);
        self.next_ship_id += 1;

        let mut body = Body::new(
            spawn.position,
            self.config.body.ship_radius,
            self.config.body.ship_mass,
        );
        body.angle = normalize_angle(spawn.angle);

        for (_, ai) in self.world.query_mut::<&mut AiController>() {
            ai.track_enemy(id);
        }

        let entity = self.world.spawn((
            Ship {
                id,
                name: spawn.name.clone(),
            },
            body,
            Hull::new(self.config.hull.clone()),
            Weapon::new(spawn.weapon),
            Engine::new(spawn.engine),
            spawn.pilot,
        ));

        if spawn.pilot == Pilot::Ai {
            let mut ai = AiController::new(self.config.ai.clone());
            for other in self.ships.keys() {
                ai.track_enemy(*other);
            }
            let _ = self.world.insert_one(entity, ai);
        }

        self.ships.insert(id, entity);
        self.score.start(id, spawn.name.clone(), self.time);
        log::info!("spawned {} ({}) as {:?} at {:?}", id, spawn.name, spawn.pilot, spawn.position);
        self.outbox.push(SimEvent::ShipSpawned {
            ship: id,
            name: spawn.name,
            pilot: spawn.pilot,
        });
        id
    }

    pub fn spawn_supply(&mut self, kind: SupplyKind, amount: f32, position: Vec2) -> SupplyId {
        let id = SupplyId(self.next_supply_id);
        self.next_supply_id += 1;
        let supply = Supply::new(kind, amount, position, self.config.body.supply_radius);
        self.world.spawn((SupplyTag { id }, supply));
        id
    }

    /// Queue a command for the next tick. Commands for unknown ships are
    /// dropped when applied.
    pub fn submit(&mut self, ship: ShipId, command: Command) {
        self.commands.push_back((ship, command));
    }

    /// Advance the simulation by `delta` milliseconds.
    pub fn update(&mut self, delta: f64) {
        let delta = delta.max(0.0);
        self.time += delta;
        let time = self.time;
        let due = self.schedule.advance(delta);

        let controls = capture_controls(&self.world);

        while let Some((ship, command)) = self.commands.pop_front() {
            match self.ships.get(&ship) {
                Some(&entity) => {
                    apply_command(&mut self.world, entity, command, time, &mut self.outbox)
                }
                None => log::debug!("dropping {:?} for unknown {}", command, ship),
            }
        }

        ai_system(
            &mut self.world,
            self.level.as_ref(),
            time,
            &mut self.rng,
            &mut self.outbox,
        );
        emit_control_changes(&self.world, &controls, &mut self.outbox);

        hull_system(&mut self.world, time, delta, &mut self.outbox);
        engine_system(&mut self.world, time);
        weapon_system(
            &mut self.world,
            time,
            &self.config.body,
            &mut self.score,
            &mut self.outbox,
        );
        movement_system(&mut self.world, self.level.as_ref(), delta);
        projectile_system(
            &mut self.world,
            self.level.as_ref(),
            time,
            delta,
            &mut self.score,
            &mut self.outbox,
        );

        if due.medium {
            supply_system(&mut self.world, &mut self.outbox);
        }

        death_system(
            &mut self.world,
            &mut self.ships,
            &mut self.score,
            time,
            &mut self.outbox,
        );

        if due.ultralow {
            stats_system(&self.world, &mut self.score);
        }
    }

    /// Take every event produced since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.outbox.events)
    }

    pub fn ship(&self, id: ShipId) -> Option<ShipSnapshot> {
        let entity = *self.ships.get(&id)?;
        snapshot_ship(&self.world, entity)
    }

    /// Every live ship, ordered by id.
    pub fn ships(&self) -> Vec<ShipSnapshot> {
        let mut ids: Vec<ShipId> = self.ships.keys().copied().collect();
        ids.sort();
        ids.into_iter().filter_map(|id| self.ship(id)).collect()
    }

    pub fn supplies(&self) -> Vec<SupplySnapshot> {
        snapshot_supplies(&self.world)
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    pub fn projectile_count(&self) -> usize {
        self.world.query::<&Projectile>().iter().count()
    }

    pub fn ai_state(&self, id: ShipId) -> Option<AiState> {
        let entity = *self.ships.get(&id)?;
        self.world.get::<&AiController>(entity).ok().map(|ai| ai.state())
    }

    /// Damage a ship from outside the simulation (scripted hazards, tests).
    /// Destruction is resolved on the next tick.
    pub fn sustain_damage(&mut self, id: ShipId, meta: DamageMetadata) -> bool {
        self.with_hull(id, |hull, outbox| outbox.hull(id, hull.sustain_damage(meta)))
    }

    pub fn repair(&mut self, id: ShipId, amount: f32) -> bool {
        self.with_hull(id, |hull, _| hull.repair(amount))
    }

    pub fn apply_heating(&mut self, id: ShipId, degrees: f32) -> bool {
        self.with_hull(id, |hull, _| hull.apply_heating(degrees))
    }

    pub fn apply_cooling(&mut self, id: ShipId, degrees: f32) -> bool {
        self.with_hull(id, |hull, _| hull.apply_cooling(degrees))
    }

    pub fn add_fuel(&mut self, id: ShipId, amount: f32) -> bool {
        self.with_hull(id, |hull, _| hull.add_fuel(amount))
    }

    pub fn reduce_fuel(&mut self, id: ShipId, amount: f32) -> bool {
        self.with_hull(id, |hull, _| hull.reduce_fuel(amount))
    }

    /// Teleport a ship and zero its velocity.
    pub fn place_ship(&mut self, id: ShipId, position: Vec2) -> bool {
        let Some(&entity) = self.ships.get(&id) else {
            return false;
        };
        match self.world.get::<&mut Body>(entity) {
            Ok(mut body) => {
                body.position = position;
                body.velocity = Vec2::ZERO;
                true
            }
            Err(_) => false,
        }
    }

    /// Remove every entity and forget all scores, keeping level and config.
    pub fn reset(&mut self) {
        self.world.clear();
        self.ships.clear();
        self.score.reset();
        self.commands.clear();
        self.outbox = Outbox::default();
        self.schedule = TierSchedule::new(&self.config.tiers);
    }

    fn with_hull(&mut self, id: ShipId, f: impl FnOnce(&mut Hull, &mut Outbox)) -> bool {
        let Some(&entity) = self.ships.get(&id) else {
            return false;
        };
        match self.world.get::<&mut Hull>(entity) {
            Ok(mut hull) => {
                f(&mut *hull, &mut self.outbox);
                true
            }
            Err(_) => false,
        }
    }
}
