//! Opponent pilot: a reactive patrol / attack / chase state machine.
//!
//! The controller never touches a ship directly. Each tick it receives an
//! [`AiPerception`] snapshot and answers with [`AiCommand`]s, which go
//! through the same command path as player input.
//!
//! # Decision order
//!
//! 1. Switch off weapon and engine if they are on (re-enabled below if needed).
//! 2. Inactive ship: stop here.
//! 3. Attacker in the damage history: face it; attack if visible, otherwise
//!    head for the last known location or patrol.
//! 4. No attacker: attack the first tracked enemy in sight, otherwise head
//!    for the last known location or patrol.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::config::AiTuning;
use crate::damage::{DamageHistory, ShipId};
use crate::geometry::Vec2;
use crate::level::Level;
use crate::pathfinding::TileCoord;
use crate::scheduler::Throttle;
use crate::vision::{can_see, view_distance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    Patrolling,
    Attacking,
    Chasing,
}

/// What the AI knows about one ship this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipView {
    pub id: ShipId,
    pub position: Vec2,
    pub angle: f32,
    pub active: bool,
}

/// Snapshot handed to [`AiController::update`].
#[derive(Debug, Clone, Copy)]
pub struct AiPerception<'a> {
    pub time: f64,
    pub me: ShipView,
    pub weapon_enabled: bool,
    pub engine_enabled: bool,
    pub damage: &'a DamageHistory,
    /// Every ship in the scene, the controlled one included.
    pub ships: &'a [ShipView],
}

impl AiPerception<'_> {
    pub fn find(&self, id: ShipId) -> Option<&ShipView> {
        self.ships.iter().find(|s| s.id == id)
    }

    /// Active ships in the scene; scales AI pacing and sight.
    pub fn ship_count(&self) -> usize {
        self.ships.iter().filter(|s| s.active).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiCommand {
    SetAngle(f32),
    SetWeaponEnabled(bool),
    SetEngineEnabled(bool),
}

/// Per-tick scratch state.
struct Tick {
    time: f64,
    me: ShipView,
    facing: f32,
    ship_count: usize,
    aggro: bool,
    commands: Vec<AiCommand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiController {
    state: AiState,
    previous_state: AiState,
    last_known_enemy_location: Option<Vec2>,
    last_saw_enemy_time: Option<f64>,
    next_weapons_fire_at: f64,
    next_thruster_fire_at: f64,
    patrol_path: VecDeque<TileCoord>,
    enemies: Vec<ShipId>,
    #[serde(skip)]
    sight_cache: HashMap<ShipId, bool>,
    sight_throttle: Throttle,
    tuning: AiTuning,
}

impl AiController {
    pub fn new(tuning: AiTuning) -> Self {
        Self {
            state: AiState::Patrolling,
            previous_state: AiState::Patrolling,
            last_known_enemy_location: None,
            last_saw_enemy_time: None,
            next_weapons_fire_at: 0.0,
            next_thruster_fire_at: 0.0,
            patrol_path: VecDeque::new(),
            enemies: Vec::new(),
            sight_cache: HashMap::new(),
            sight_throttle: Throttle::new(tuning.sight_interval_ms),
            tuning,
        }
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn previous_state(&self) -> AiState {
        self.previous_state
    }

    pub fn last_known_location(&self) -> Option<Vec2> {
        self.last_known_enemy_location
    }

    pub fn patrol_path(&self) -> impl Iterator<Item = &TileCoord> {
        self.patrol_path.iter()
    }

    pub fn tracked_enemies(&self) -> &[ShipId] {
        &self.enemies
    }

    pub fn next_weapons_fire_at(&self) -> f64 {
        self.next_weapons_fire_at
    }

    pub fn next_thruster_fire_at(&self) -> f64 {
        self.next_thruster_fire_at
    }

    pub fn track_enemy(&mut self, id: ShipId) {
        if !self.enemies.contains(&id) {
            self.enemies.push(id);
        }
    }

    pub fn untrack_enemy(&mut self, id: ShipId) {
        self.enemies.retain(|e| *e != id);
        self.sight_cache.remove(&id);
    }

    /// Who to retaliate against, per [`DamageHistory::last_attacker`].
    pub fn has_attacker(&self, damage: &DamageHistory) -> Option<ShipId> {
        damage.last_attacker()
    }

    /// Whether a sighting is still remembered. Expired memory is cleared.
    pub fn has_last_known(&mut self, time: f64, aggro: bool) -> bool {
        let Some(saw) = self.last_saw_enemy_time else {
            return false;
        };
        if self.last_known_enemy_location.is_none() {
            return false;
        }
        let timeout = if aggro {
            self.tuning.aggro_memory_ms
        } else {
            self.tuning.idle_memory_ms
        };
        if time - saw > timeout {
            self.clear_last_known();
            return false;
        }
        true
    }

    fn clear_last_known(&mut self) {
        self.last_known_enemy_location = None;
        self.last_saw_enemy_time = None;
    }

    /// Run one decision tick.
    pub fn update<R: Rng>(
        &mut self,
        perception: &AiPerception<'_>,
        level: &dyn Level,
        rng: &mut R,
    ) -> Vec<AiCommand> {
        let mut tick = Tick {
            time: perception.time,
            me: perception.me,
            facing: perception.me.angle,
            ship_count: perception.ship_count(),
            aggro: false,
            commands: Vec::new(),
        };

        if perception.weapon_enabled {
            tick.commands.push(AiCommand::SetWeaponEnabled(false));
        }
        if perception.engine_enabled {
            tick.commands.push(AiCommand::SetEngineEnabled(false));
        }
        if !perception.me.active {
            return tick.commands;
        }

        if self.sight_throttle.ready(perception.time) {
            self.sight_cache.clear();
        }

        let attacker = self
            .has_attacker(perception.damage)
            .filter(|id| *id != perception.me.id)
            .and_then(|id| perception.find(id))
            .filter(|s| s.active)
            .copied();
        tick.aggro = attacker.is_some();

        if let Some(target) = attacker {
            self.face(&mut tick, target.position);
            if self.can_see(&tick, level, &target) {
                self.attack(&mut tick, level, rng, target);
            } else {
                self.pursue_or_patrol(&mut tick, level, rng);
            }
            return tick.commands;
        }

        let enemies = self.enemies.clone();
        let visible = enemies
            .into_iter()
            .filter_map(|id| perception.find(id).copied())
            .filter(|s| s.active && s.id != perception.me.id)
            .find(|s| self.can_see(&tick, level, s));

        match visible {
            Some(target) => self.attack(&mut tick, level, rng, target),
            None => self.pursue_or_patrol(&mut tick, level, rng),
        }
        tick.commands
    }

    fn set_state(&mut self, tick: &Tick, state: AiState) {
        if state != self.state {
            self.previous_state = self.state;
            self.state = state;
            log::debug!(
                "{} ai {:?} -> {:?} at {:.0}ms",
                tick.me.id,
                self.previous_state,
                self.state,
                tick.time
            );
        }
    }

    fn face(&self, tick: &mut Tick, target: Vec2) {
        if target == tick.me.position {
            return;
        }
        let angle = tick.me.position.angle_to(&target);
        if angle != tick.facing {
            tick.facing = angle;
            tick.commands.push(AiCommand::SetAngle(angle));
        }
    }

    /// Rate-limited sight check; results are reused until the sight window
    /// rolls over.
    fn can_see(&mut self, tick: &Tick, level: &dyn Level, target: &ShipView) -> bool {
        if let Some(&seen) = self.sight_cache.get(&target.id) {
            return seen;
        }
        let distance = view_distance(tick.ship_count, tick.aggro, &self.tuning);
        let seen = can_see(
            level,
            tick.me.position,
            tick.facing,
            target.position,
            distance,
            self.tuning.view_half_angle,
        );
        self.sight_cache.insert(target.id, seen);
        seen
    }

    fn attack<R: Rng>(
        &mut self,
        tick: &mut Tick,
        level: &dyn Level,
        rng: &mut R,
        target: ShipView,
    ) {
        self.last_known_enemy_location = Some(target.position);
        self.last_saw_enemy_time = Some(tick.time);
        self.patrol_path.clear();
        self.face(tick, target.position);

        if tick.time >= self.next_weapons_fire_at {
            tick.commands.push(AiCommand::SetWeaponEnabled(true));
            self.next_weapons_fire_at = tick.time
                + tick.ship_count as f64 * self.tuning.weapons_delay_per_ship_ms
                + jitter(rng, self.tuning.weapons_jitter_ms);
            self.set_state(tick, AiState::Attacking);
        } else {
            self.set_state(tick, AiState::Chasing);
            self.navigate_to(tick, level, rng, target.position);
        }
    }

    fn pursue_or_patrol<R: Rng>(&mut self, tick: &mut Tick, level: &dyn Level, rng: &mut R) {
        if self.has_last_known(tick.time, tick.aggro) {
            if let Some(location) = self.last_known_enemy_location {
                self.set_state(tick, AiState::Chasing);
                if self.navigate_to(tick, level, rng, location) {
                    self.clear_last_known();
                }
                return;
            }
        }
        self.patrol(tick, level, rng);
    }

    /// Steer toward `location`. Returns true once the ship is in its tile.
    fn navigate_to<R: Rng>(
        &mut self,
        tick: &mut Tick,
        level: &dyn Level,
        rng: &mut R,
        location: Vec2,
    ) -> bool {
        let Some(tile) = level.tile_at_world(location) else {
            return false;
        };
        if level.is_within_tile(tick.me.position, tile) {
            return true;
        }
        self.face(tick, level.tile_to_world(tile));
        if tick.time >= self.next_thruster_fire_at {
            tick.commands.push(AiCommand::SetEngineEnabled(true));
            self.next_thruster_fire_at = tick.time
                + tick.ship_count as f64 * self.tuning.thruster_delay_per_ship_ms
                + jitter(rng, self.tuning.thruster_jitter_ms);
        }
        false
    }

    fn patrol<R: Rng>(&mut self, tick: &mut Tick, level: &dyn Level, rng: &mut R) {
        self.set_state(tick, AiState::Patrolling);
        if self.patrol_path.is_empty() {
            self.plan_patrol(tick, level, rng);
        }
        if let Some(&waypoint) = self.patrol_path.front() {
            let target = level.tile_to_world(waypoint);
            if self.navigate_to(tick, level, rng, target) {
                self.patrol_path.pop_front();
            }
        }
    }

    fn plan_patrol<R: Rng>(&mut self, tick: &Tick, level: &dyn Level, rng: &mut R) {
        let Some(room) = level.room_at_world(tick.me.position) else {
            return;
        };
        let Some(from) = level.tile_at_world(tick.me.position) else {
            return;
        };
        if room.width <= 0 || room.height <= 0 {
            return;
        }
        for _ in 0..self.tuning.patrol_pick_attempts {
            let goal = TileCoord::new(
                rng.gen_range(room.x..room.x + room.width),
                rng.gen_range(room.y..room.y + room.height),
            );
            if goal == from || !level.is_walkable(goal) {
                continue;
            }
            if let Some(path) = level.find_path(from, goal) {
                if !path.is_empty() {
                    log::trace!("{} patrol to {:?} ({} steps)", tick.me.id, goal, path.len());
                    self.patrol_path = path.into();
                    return;
                }
            }
        }
    }
}

impl Default for AiController {
    fn default() -> Self {
        Self::new(AiTuning::default())
    }
}

fn jitter<R: Rng>(rng: &mut R, max: f64) -> f64 {
    if max > 0.0 {
        rng.gen_range(0.0..max)
    } else {
        0.0
    }
}
