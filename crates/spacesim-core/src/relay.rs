//! Network relay envelopes.
//!
//! Multiplayer sessions relay a handful of named events through a server.
//! Each message carries a monotonic `sent` stamp from its sender; receivers
//! run incoming envelopes through a [`StaleFilter`] so that a late or
//! reordered message never overwrites newer state. The transport itself
//! lives in the host.

use serde::{Deserialize, Serialize};
use spacesim_logic::damage::ShipId;
use spacesim_logic::score::LeaderboardEntry;
use std::collections::HashMap;
use thiserror::Error;

use crate::events::{Command, ShipSnapshot, SupplySnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum NetEvent {
    JoinRoom { room: String, player: String },
    RequestMap { room: String },
    SetAngle { ship: ShipId, angle: f32 },
    EngineToggle { ship: ShipId, enabled: bool },
    WeaponToggle { ship: ShipId, enabled: bool },
    UpdatePlayers { players: Vec<ShipSnapshot> },
    UpdateSupplies { supplies: Vec<SupplySnapshot> },
    UpdateStats { stats: Vec<LeaderboardEntry> },
    PlayerDeath { ship: ShipId, killer: Option<ShipId> },
}

impl NetEvent {
    /// Wire name; also the key staleness is tracked under.
    pub fn name(&self) -> &'static str {
        match self {
            NetEvent::JoinRoom { .. } => "join_room",
            NetEvent::RequestMap { .. } => "request_map",
            NetEvent::SetAngle { .. } => "set_angle",
            NetEvent::EngineToggle { .. } => "engine_toggle",
            NetEvent::WeaponToggle { .. } => "weapon_toggle",
            NetEvent::UpdatePlayers { .. } => "update_players",
            NetEvent::UpdateSupplies { .. } => "update_supplies",
            NetEvent::UpdateStats { .. } => "update_stats",
            NetEvent::PlayerDeath { .. } => "player_death",
        }
    }

    /// The ship command a remote input event maps to, if any.
    pub fn to_command(&self) -> Option<(ShipId, Command)> {
        match *self {
            NetEvent::SetAngle { ship, angle } => Some((ship, Command::SetAngle(angle))),
            NetEvent::EngineToggle { ship, enabled } => {
                Some((ship, Command::SetEngineEnabled(enabled)))
            }
            NetEvent::WeaponToggle { ship, enabled } => {
                Some((ship, Command::SetWeaponEnabled(enabled)))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub sent: u64,
    pub event: NetEvent,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed relay message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("stale {event} message: sent {sent}, already saw {last}")]
    Stale {
        event: &'static str,
        sent: u64,
        last: u64,
    },
}

/// Stamps outgoing events with a strictly increasing counter.
#[derive(Debug, Default)]
pub struct Stamper {
    next: u64,
}

impl Stamper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wrap(&mut self, event: NetEvent) -> Envelope {
        self.next += 1;
        Envelope {
            sent: self.next,
            event,
        }
    }

    pub fn encode(&mut self, event: NetEvent) -> Result<String, RelayError> {
        Ok(serde_json::to_string(&self.wrap(event))?)
    }
}

/// Drops envelopes that are not newer than the last accepted one of the
/// same event name.
#[derive(Debug, Default)]
pub struct StaleFilter {
    last_seen: HashMap<&'static str, u64>,
}

impl StaleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, envelope: &Envelope) -> Result<(), RelayError> {
        let name = envelope.event.name();
        if let Some(&last) = self.last_seen.get(name) {
            if envelope.sent <= last {
                return Err(RelayError::Stale {
                    event: name,
                    sent: envelope.sent,
                    last,
                });
            }
        }
        self.last_seen.insert(name, envelope.sent);
        Ok(())
    }

    /// Decode a JSON envelope and accept it in one step.
    pub fn decode(&mut self, json: &str) -> Result<Envelope, RelayError> {
        let envelope: Envelope = serde_json::from_str(json)?;
        self.accept(&envelope)?;
        Ok(envelope)
    }

    pub fn reset(&mut self) {
        self.last_seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle(sent: u64, angle: f32) -> Envelope {
        Envelope {
            sent,
            event: NetEvent::SetAngle {
                ship: ShipId(1),
                angle,
            },
        }
    }

    #[test]
    fn test_stale_messages_dropped_per_event() {
        let mut filter = StaleFilter::new();
        assert!(filter.accept(&angle(5, 0.1)).is_ok());
        assert!(matches!(
            filter.accept(&angle(4, 0.2)),
            Err(RelayError::Stale { sent: 4, last: 5, .. })
        ));
        assert!(filter.accept(&angle(5, 0.2)).is_err());

        // A different event name has its own clock.
        let toggle = Envelope {
            sent: 1,
            event: NetEvent::EngineToggle {
                ship: ShipId(1),
                enabled: true,
            },
        };
        assert!(filter.accept(&toggle).is_ok());
        assert!(filter.accept(&angle(6, 0.3)).is_ok());
    }

    #[test]
    fn test_stamper_through_filter() {
        let mut stamper = Stamper::new();
        let mut filter = StaleFilter::new();
        let first = stamper
            .encode(NetEvent::RequestMap {
                room: "alpha".into(),
            })
            .unwrap();
        let second = stamper
            .encode(NetEvent::RequestMap {
                room: "alpha".into(),
            })
            .unwrap();

        assert!(filter.decode(&second).is_ok());
        assert!(matches!(filter.decode(&first), Err(RelayError::Stale { .. })));
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(angle(3, 1.5)).unwrap();
        assert_eq!(json["sent"], 3);
        assert_eq!(json["event"]["event"], "set_angle");
        assert_eq!(json["event"]["data"]["angle"], 1.5);
    }

    #[test]
    fn test_input_events_map_to_commands() {
        assert_eq!(
            angle(1, 0.5).event.to_command(),
            Some((ShipId(1), Command::SetAngle(0.5)))
        );
        let death = NetEvent::PlayerDeath {
            ship: ShipId(2),
            killer: None,
        };
        assert_eq!(death.to_command(), None);
    }

    #[test]
    fn test_garbage_rejected() {
        let mut filter = StaleFilter::new();
        assert!(matches!(filter.decode("{}"), Err(RelayError::Decode(_))));
    }
}
