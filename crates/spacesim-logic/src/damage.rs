//! Damage-source bookkeeping.
//!
//! Every hit a ship takes is recorded in a short ring buffer so the AI can
//! work out who is shooting at it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::constants::hull::DAMAGE_HISTORY_LEN;

/// Identifier the simulation context hands out to every ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub u32);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ship#{}", self.0)
    }
}

/// A single damage application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageMetadata {
    pub amount: f32,
    pub timestamp: f64,
    pub attacker_id: Option<ShipId>,
    pub message: Option<String>,
}

impl DamageMetadata {
    pub fn new(amount: f32, timestamp: f64) -> Self {
        Self {
            amount,
            timestamp,
            attacker_id: None,
            message: None,
        }
    }

    pub fn from_attacker(mut self, attacker: ShipId) -> Self {
        self.attacker_id = Some(attacker);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// What survives in the history once the damage is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageRecord {
    pub timestamp: f64,
    pub attacker_id: Option<ShipId>,
    pub message: Option<String>,
}

impl From<&DamageMetadata> for DamageRecord {
    fn from(meta: &DamageMetadata) -> Self {
        Self {
            timestamp: meta.timestamp,
            attacker_id: meta.attacker_id,
            message: meta.message.clone(),
        }
    }
}

/// Append-only ring buffer of the most recent damage records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageHistory {
    records: VecDeque<DamageRecord>,
    capacity: usize,
}

impl DamageHistory {
    pub fn new() -> Self {
        Self::with_capacity(DAMAGE_HISTORY_LEN)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append a record, evicting the oldest once full.
    pub fn push(&mut self, record: DamageRecord) {
        if self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DamageRecord> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// The attacker the AI should retaliate against.
    ///
    /// Attacker ids are de-duplicated keeping the order of their *first*
    /// appearance, and the last entry of that list wins. For a history of
    /// `[A, B, A]` this yields `B`, not `A`: a repeat offender is not bumped
    /// to the end. Kept as-is for compatibility with existing replays.
    pub fn last_attacker(&self) -> Option<ShipId> {
        let mut seen: Vec<ShipId> = Vec::with_capacity(self.records.len());
        for id in self.records.iter().filter_map(|r| r.attacker_id) {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen.pop()
    }

    /// Attacker of the newest record that has one. Used to credit kills.
    pub fn most_recent_attacker(&self) -> Option<ShipId> {
        self.records.iter().rev().find_map(|r| r.attacker_id)
    }
}

impl Default for DamageHistory {
    fn default() -> Self {
        Self::new()
    }
}
