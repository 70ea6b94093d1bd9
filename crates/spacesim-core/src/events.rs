//! Inbound commands and outbound simulation events.
//!
//! Player input and AI decisions both become [`Command`]s applied at the
//! start of a tick. Everything the host may want to react to (sound,
//! flicker, network sync) is queued as a [`SimEvent`] and drained once per
//! tick with [`crate::engine::SimulationEngine::drain_events`].

use serde::{Deserialize, Serialize};
use spacesim_logic::ai::{AiCommand, AiState};
use spacesim_logic::attachments::{EngineKind, WeaponKind};
use spacesim_logic::damage::ShipId;
use spacesim_logic::geometry::Vec2;
use spacesim_logic::hull::{DestroyCause, HullEvent};
use spacesim_logic::supply::SupplyKind;

use crate::components::{Pilot, SupplyId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Command {
    SetAngle(f32),
    SetEngineEnabled(bool),
    SetWeaponEnabled(bool),
    SelfDestruct,
    CancelSelfDestruct,
}

impl From<AiCommand> for Command {
    fn from(command: AiCommand) -> Self {
        match command {
            AiCommand::SetAngle(angle) => Command::SetAngle(angle),
            AiCommand::SetWeaponEnabled(on) => Command::SetWeaponEnabled(on),
            AiCommand::SetEngineEnabled(on) => Command::SetEngineEnabled(on),
        }
    }
}

/// Point-in-time view of a ship, attached to death events and relay updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    pub id: ShipId,
    pub name: String,
    pub pilot: Pilot,
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub active: bool,
    pub integrity: f32,
    pub fuel: f32,
    pub temperature: f32,
    pub overheating: bool,
    pub destroyed: bool,
    pub weapon: Option<WeaponKind>,
    pub weapon_enabled: bool,
    pub ammo: u32,
    pub engine: Option<EngineKind>,
    pub engine_enabled: bool,
    pub ai_state: Option<AiState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplySnapshot {
    pub id: SupplyId,
    pub kind: SupplyKind,
    pub amount: f32,
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    ShipSpawned {
        ship: ShipId,
        name: String,
        pilot: Pilot,
    },
    EngineChanged {
        ship: ShipId,
        enabled: bool,
    },
    WeaponChanged {
        ship: ShipId,
        enabled: bool,
    },
    ShipAngleChanged {
        ship: ShipId,
        angle: f32,
    },
    ShipDamaged {
        ship: ShipId,
        amount: f32,
        attacker: Option<ShipId>,
    },
    OverheatingChanged {
        ship: ShipId,
        overheating: bool,
    },
    SelfDestructCountdown {
        ship: ShipId,
        remaining: u32,
    },
    SelfDestructCancelled {
        ship: ShipId,
    },
    ShipDestroyed {
        ship: ShipId,
        cause: DestroyCause,
        killer: Option<ShipId>,
        snapshot: Box<ShipSnapshot>,
    },
    ProjectileFired {
        ship: ShipId,
        weapon: WeaponKind,
        position: Vec2,
        velocity: Vec2,
    },
    ProjectileHit {
        shooter: ShipId,
        target: ShipId,
        damage: f32,
    },
    SupplyCollected {
        ship: ShipId,
        supply: SupplyId,
        kind: SupplyKind,
    },
    AiStateChanged {
        ship: ShipId,
        from: AiState,
        to: AiState,
    },
}

/// Events and pending deaths collected while systems run.
#[derive(Debug, Default)]
pub struct Outbox {
    pub events: Vec<SimEvent>,
    /// Ships whose hull reported destruction; resolved by the death system.
    pub deaths: Vec<(ShipId, DestroyCause)>,
}

impl Outbox {
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Translate hull side effects for `ship`.
    pub fn hull(&mut self, ship: ShipId, events: Vec<HullEvent>) {
        for event in events {
            match event {
                HullEvent::Damaged { amount, attacker } => self.push(SimEvent::ShipDamaged {
                    ship,
                    amount,
                    attacker,
                }),
                HullEvent::OverheatingChanged { overheating } => {
                    self.push(SimEvent::OverheatingChanged { ship, overheating })
                }
                HullEvent::SelfDestructStep { remaining } => {
                    self.push(SimEvent::SelfDestructCountdown { ship, remaining })
                }
                HullEvent::SelfDestructCancelled => {
                    self.push(SimEvent::SelfDestructCancelled { ship })
                }
                HullEvent::Destroyed { cause } => self.deaths.push((ship, cause)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroyed_hull_event_becomes_pending_death() {
        let mut outbox = Outbox::default();
        outbox.hull(
            ShipId(3),
            vec![
                HullEvent::Damaged {
                    amount: 40.0,
                    attacker: Some(ShipId(1)),
                },
                HullEvent::Destroyed {
                    cause: DestroyCause::IntegrityDepleted,
                },
            ],
        );
        assert_eq!(outbox.events.len(), 1);
        assert_eq!(
            outbox.deaths,
            vec![(ShipId(3), DestroyCause::IntegrityDepleted)]
        );
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_value(SimEvent::WeaponChanged {
            ship: ShipId(2),
            enabled: true,
        })
        .unwrap();
        assert_eq!(json["event"], "weapon_changed");
        assert_eq!(json["enabled"], true);
    }
}
