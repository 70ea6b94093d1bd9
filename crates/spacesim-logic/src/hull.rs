//! Ship resource simulation: integrity, fuel, temperature, self-destruct.
//!
//! `Hull` owns the numbers; it never talks to the world directly. Every
//! mutator reports what happened as [`HullEvent`]s and the caller decides
//! how to surface them (flicker, warnings, removal from the world).
//!
//! # Lifecycle
//!
//! A hull starts full and cool. Once destroyed it is terminal: `update`
//! and the mutators become no-ops and `destroy` never reports twice.

use serde::{Deserialize, Serialize};

use crate::config::HullTuning;
use crate::damage::{DamageHistory, DamageMetadata, DamageRecord, ShipId};

/// Why a hull was destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    IntegrityDepleted,
    Overheated,
    SelfDestruct,
}

/// Side effects of a hull mutation, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HullEvent {
    /// Integrity was reduced; drives hit feedback.
    Damaged {
        amount: f32,
        attacker: Option<ShipId>,
    },
    OverheatingChanged { overheating: bool },
    SelfDestructStep { remaining: u32 },
    SelfDestructCancelled,
    Destroyed { cause: DestroyCause },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct SelfDestruct {
    remaining: u32,
    next_step_at: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hull {
    integrity: f32,
    remaining_fuel: f32,
    temperature: f32,
    overheating: bool,
    destroyed: bool,
    damage: DamageHistory,
    self_destruct: Option<SelfDestruct>,
    tuning: HullTuning,
}

impl Hull {
    pub fn new(tuning: HullTuning) -> Self {
        Self {
            integrity: tuning.max_integrity,
            remaining_fuel: tuning.max_fuel,
            temperature: 0.0,
            overheating: false,
            destroyed: false,
            damage: DamageHistory::with_capacity(tuning.damage_history_len),
            self_destruct: None,
            tuning,
        }
    }

    pub fn integrity(&self) -> f32 {
        self.integrity
    }

    pub fn remaining_fuel(&self) -> f32 {
        self.remaining_fuel
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn is_overheating(&self) -> bool {
        self.overheating
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn damage_history(&self) -> &DamageHistory {
        &self.damage
    }

    pub fn tuning(&self) -> &HullTuning {
        &self.tuning
    }

    /// Steps left on an active self-destruct countdown.
    pub fn self_destruct_remaining(&self) -> Option<u32> {
        self.self_destruct.map(|s| s.remaining)
    }

    /// Per-tick heat check, overheat damage, passive cooling and countdown.
    ///
    /// `time` and `delta` are milliseconds.
    pub fn update(&mut self, time: f64, delta: f64) -> Vec<HullEvent> {
        let mut events = Vec::new();
        if self.destroyed {
            return events;
        }

        if self.temperature > self.tuning.max_temperature {
            self.destroy_into(DestroyCause::Overheated, &mut events);
            return events;
        }

        let overheating = self.temperature > self.tuning.max_safe_temperature;
        if overheating != self.overheating {
            self.overheating = overheating;
            log::trace!("overheating {} at {:.1} degrees", overheating, self.temperature);
            events.push(HullEvent::OverheatingChanged { overheating });
        }

        let seconds = (delta / 1000.0) as f32;

        if self.overheating {
            let meta = DamageMetadata::new(seconds * self.tuning.overheat_damage_per_second, time)
                .with_message("overheating");
            events.extend(self.sustain_damage(meta));
            if self.destroyed {
                return events;
            }
        }

        self.temperature =
            (self.temperature - self.tuning.cooling_rate_per_second * seconds).max(0.0);

        if let Some(mut countdown) = self.self_destruct {
            while countdown.remaining > 0 && time >= countdown.next_step_at {
                countdown.remaining -= 1;
                countdown.next_step_at += self.tuning.self_destruct_step_ms;
                events.push(HullEvent::SelfDestructStep {
                    remaining: countdown.remaining,
                });
            }
            if countdown.remaining == 0 {
                self.self_destruct = None;
                self.destroy_into(DestroyCause::SelfDestruct, &mut events);
            } else {
                self.self_destruct = Some(countdown);
            }
        }

        events
    }

    /// Record the source and subtract `amount` from integrity.
    pub fn sustain_damage(&mut self, meta: DamageMetadata) -> Vec<HullEvent> {
        let mut events = Vec::new();
        if self.destroyed {
            return events;
        }

        self.damage.push(DamageRecord::from(&meta));
        self.integrity -= meta.amount;
        events.push(HullEvent::Damaged {
            amount: meta.amount,
            attacker: meta.attacker_id,
        });

        if self.integrity <= 0.0 {
            self.integrity = 0.0;
            self.destroy_into(DestroyCause::IntegrityDepleted, &mut events);
        }
        events
    }

    pub fn repair(&mut self, amount: f32) {
        if self.destroyed {
            return;
        }
        self.integrity = (self.integrity + amount).clamp(0.0, self.tuning.max_integrity);
    }

    pub fn reduce_fuel(&mut self, amount: f32) {
        self.remaining_fuel = (self.remaining_fuel - amount).clamp(0.0, self.tuning.max_fuel);
    }

    pub fn add_fuel(&mut self, amount: f32) {
        self.remaining_fuel = (self.remaining_fuel + amount).clamp(0.0, self.tuning.max_fuel);
    }

    pub fn apply_heating(&mut self, degrees: f32) {
        self.temperature = (self.temperature + degrees).max(0.0);
    }

    pub fn apply_cooling(&mut self, degrees: f32) {
        self.temperature = (self.temperature - degrees).max(0.0);
    }

    /// Start the countdown. The first step lands one step interval after `time`.
    pub fn self_destruct(&mut self, time: f64) -> Vec<HullEvent> {
        if self.destroyed || self.self_destruct.is_some() {
            return Vec::new();
        }
        let steps = self.tuning.self_destruct_steps;
        if steps == 0 {
            let mut events = Vec::new();
            self.destroy_into(DestroyCause::SelfDestruct, &mut events);
            return events;
        }
        self.self_destruct = Some(SelfDestruct {
            remaining: steps,
            next_step_at: time + self.tuning.self_destruct_step_ms,
        });
        vec![HullEvent::SelfDestructStep { remaining: steps }]
    }

    pub fn cancel_self_destruct(&mut self) -> Vec<HullEvent> {
        if self.self_destruct.take().is_some() {
            vec![HullEvent::SelfDestructCancelled]
        } else {
            Vec::new()
        }
    }

    /// Terminal transition. Returns the event only the first time.
    pub fn destroy(&mut self, cause: DestroyCause) -> Option<HullEvent> {
        let mut events = Vec::new();
        self.destroy_into(cause, &mut events);
        events.pop()
    }

    fn destroy_into(&mut self, cause: DestroyCause, events: &mut Vec<HullEvent>) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.self_destruct = None;
        log::debug!("hull destroyed: {:?}", cause);
        events.push(HullEvent::Destroyed { cause });
    }
}

impl Default for Hull {
    fn default() -> Self {
        Self::new(HullTuning::default())
    }
}
