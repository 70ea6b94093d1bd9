//! Per-ship combat statistics and the leaderboard.
//!
//! Records are keyed by [`ShipId`]. A record is opened with
//! [`ScoreTracker::start`] when a ship spawns and closed with
//! [`ScoreTracker::stop`] when it dies; closed records stay in the tracker
//! until [`ScoreTracker::reset`] so they can still be ranked.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::score::POINTS_PER_KILL;
use crate::damage::ShipId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    pub damage: f32,
    pub time: f64,
}

/// Hits landed on one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetHits {
    pub target: ShipId,
    pub hits: Vec<HitRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KillRecord {
    pub target: ShipId,
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    pub ship: ShipId,
    pub name: String,
    pub shots_fired: u32,
    pub hits: Vec<TargetHits>,
    pub destroyed: Vec<KillRecord>,
    pub remaining_ammo: u32,
    pub integrity: f32,
    pub fuel: f32,
    pub started_at: f64,
    pub stopped_at: Option<f64>,
}

impl ShipStats {
    fn new(ship: ShipId, name: String, time: f64) -> Self {
        Self {
            ship,
            name,
            shots_fired: 0,
            hits: Vec::new(),
            destroyed: Vec::new(),
            remaining_ammo: 0,
            integrity: 0.0,
            fuel: 0.0,
            started_at: time,
            stopped_at: None,
        }
    }

    pub fn landed_shots(&self) -> usize {
        self.hits.iter().map(|t| t.hits.len()).sum()
    }

    pub fn damage_dealt(&self) -> f32 {
        self.hits
            .iter()
            .flat_map(|t| t.hits.iter())
            .map(|h| h.damage)
            .sum()
    }

    /// Percentage of fired shots that landed; 0 when nothing was fired.
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            return 0.0;
        }
        self.landed_shots() as f32 / self.shots_fired as f32 * 100.0
    }

    pub fn score(&self) -> f32 {
        self.destroyed.len() as f32 * POINTS_PER_KILL + self.accuracy()
    }

    /// Time alive: up to `stopped_at`, or up to `now` while still running.
    pub fn elapsed_ms(&self, now: f64) -> f64 {
        (self.stopped_at.unwrap_or(now) - self.started_at).max(0.0)
    }

    pub fn is_running(&self) -> bool {
        self.stopped_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub ship: ShipId,
    pub score: f32,
    pub accuracy: f32,
    pub kills: usize,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreTracker {
    records: HashMap<ShipId, ShipStats>,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh record for `ship`, replacing any previous one.
    pub fn start(&mut self, ship: ShipId, name: impl Into<String>, time: f64) {
        self.records.insert(ship, ShipStats::new(ship, name.into(), time));
    }

    /// Close the record. Stopping twice keeps the first stop time.
    pub fn stop(&mut self, ship: ShipId, time: f64) {
        if let Some(stats) = self.records.get_mut(&ship) {
            if stats.stopped_at.is_none() {
                stats.stopped_at = Some(time);
            }
        }
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    pub fn get(&self, ship: ShipId) -> Option<&ShipStats> {
        self.records.get(&ship)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShipStats> {
        self.records.values()
    }

    pub fn record_shot(&mut self, ship: ShipId) {
        if let Some(stats) = self.running_mut(ship) {
            stats.shots_fired += 1;
        }
    }

    pub fn record_hit(&mut self, shooter: ShipId, target: ShipId, damage: f32, time: f64) {
        let Some(stats) = self.running_mut(shooter) else {
            return;
        };
        let hit = HitRecord { damage, time };
        match stats.hits.iter_mut().find(|t| t.target == target) {
            Some(existing) => existing.hits.push(hit),
            None => stats.hits.push(TargetHits {
                target,
                hits: vec![hit],
            }),
        }
    }

    /// Credit `killer` with destroying `target`. Counts even if the killer
    /// died first, since its projectile was already in flight.
    pub fn record_kill(&mut self, killer: ShipId, target: ShipId, time: f64) {
        if killer == target {
            return;
        }
        if let Some(stats) = self.records.get_mut(&killer) {
            stats.destroyed.push(KillRecord { target, time });
        }
    }

    pub fn snapshot(&mut self, ship: ShipId, remaining_ammo: u32, integrity: f32, fuel: f32) {
        if let Some(stats) = self.running_mut(ship) {
            stats.remaining_ammo = remaining_ammo;
            stats.integrity = integrity;
            stats.fuel = fuel;
        }
    }

    /// One entry per player name (the most recently started record wins),
    /// highest score first.
    pub fn leaderboard(&self, now: f64) -> Vec<LeaderboardEntry> {
        let mut latest: HashMap<&str, &ShipStats> = HashMap::new();
        for stats in self.records.values() {
            let newer = latest.get(stats.name.as_str()).map_or(true, |prev| {
                (prev.started_at, prev.ship) < (stats.started_at, stats.ship)
            });
            if newer {
                latest.insert(stats.name.as_str(), stats);
            }
        }

        let mut board: Vec<LeaderboardEntry> = latest
            .into_values()
            .map(|s| LeaderboardEntry {
                name: s.name.clone(),
                ship: s.ship,
                score: s.score(),
                accuracy: s.accuracy(),
                kills: s.destroyed.len(),
                elapsed_ms: s.elapsed_ms(now),
            })
            .collect();
        board.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.name.cmp(&b.name))
        });
        board
    }

    fn running_mut(&mut self, ship: ShipId) -> Option<&mut ShipStats> {
        self.records.get_mut(&ship).filter(|s| s.is_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const A: ShipId = ShipId(1);
    const B: ShipId = ShipId(2);
    const C: ShipId = ShipId(3);

    #[test]
    fn test_accuracy_zero_without_shots() {
        let mut t = ScoreTracker::new();
        t.start(A, "ace", 0.0);
        assert_eq!(t.get(A).unwrap().accuracy(), 0.0);
        assert_eq!(t.get(A).unwrap().score(), 0.0);
    }

    #[test]
    fn test_accuracy_and_score() {
        let mut t = ScoreTracker::new();
        t.start(A, "ace", 0.0);
        for _ in 0..4 {
            t.record_shot(A);
        }
        t.record_hit(A, B, 2.0, 10.0);
        t.record_hit(A, B, 2.0, 20.0);
        t.record_hit(A, C, 12.0, 30.0);
        t.record_kill(A, B, 40.0);

        let stats = t.get(A).unwrap();
        assert_eq!(stats.landed_shots(), 3);
        assert_eq!(stats.hits.len(), 2);
        assert_relative_eq!(stats.accuracy(), 75.0);
        assert_relative_eq!(stats.score(), 1075.0);
        assert_relative_eq!(stats.damage_dealt(), 16.0);
    }

    #[test]
    fn test_stop_freezes_record() {
        let mut t = ScoreTracker::new();
        t.start(A, "ace", 100.0);
        t.stop(A, 600.0);
        t.stop(A, 900.0);
        t.record_shot(A);

        let stats = t.get(A).unwrap();
        assert_eq!(stats.shots_fired, 0);
        assert_eq!(stats.elapsed_ms(5000.0), 500.0);
    }

    #[test]
    fn test_elapsed_while_running() {
        let mut t = ScoreTracker::new();
        t.start(A, "ace", 100.0);
        assert_eq!(t.get(A).unwrap().elapsed_ms(350.0), 250.0);
    }

    #[test]
    fn test_kill_credited_after_killer_stopped() {
        let mut t = ScoreTracker::new();
        t.start(A, "ace", 0.0);
        t.stop(A, 10.0);
        t.record_kill(A, B, 20.0);
        t.record_kill(A, A, 20.0);
        assert_eq!(t.get(A).unwrap().destroyed.len(), 1);
    }

    #[test]
    fn test_snapshot() {
        let mut t = ScoreTracker::new();
        t.start(A, "ace", 0.0);
        t.snapshot(A, 37, 80.0, 55.5);
        let stats = t.get(A).unwrap();
        assert_eq!(stats.remaining_ammo, 37);
        assert_eq!(stats.integrity, 80.0);
        assert_eq!(stats.fuel, 55.5);
    }

    #[test]
    fn test_leaderboard_dedupes_by_name_keeping_latest() {
        let mut t = ScoreTracker::new();
        t.start(A, "ace", 0.0);
        t.record_kill(A, C, 5.0);
        t.record_kill(A, C, 6.0);
        t.stop(A, 10.0);
        // Same player respawned with a new ship.
        t.start(B, "ace", 20.0);
        t.start(C, "rookie", 0.0);
        t.record_kill(C, A, 8.0);

        let board = t.leaderboard(100.0);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].name, "rookie");
        assert_eq!(board[0].score, 1000.0);
        assert_eq!(board[1].name, "ace");
        assert_eq!(board[1].ship, B);
        assert_eq!(board[1].score, 0.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut t = ScoreTracker::new();
        t.start(A, "ace", 0.0);
        t.reset();
        assert!(t.is_empty());
        assert!(t.leaderboard(0.0).is_empty());
    }
}
