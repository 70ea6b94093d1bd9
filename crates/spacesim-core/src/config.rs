//! Loading tuning and level files.
//!
//! Both are JSON. A tuning file may be partial: missing fields keep their
//! defaults. Loaded tuning is always validated.

use serde::{Deserialize, Serialize};
use spacesim_logic::config::{InvalidTuning, SimConfig};
use spacesim_logic::level::{GridLevel, LevelError, RoomRect};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Tuning(#[from] InvalidTuning),
    #[error("bad level map: {0}")]
    Level(#[from] LevelError),
    #[error("room {id} extends past the map edge")]
    RoomOutOfBounds { id: u32 },
}

pub fn parse_config(json: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<SimConfig, ConfigError> {
    let config = parse_config(&read(path.as_ref())?)?;
    log::info!("loaded tuning from {}", path.as_ref().display());
    Ok(config)
}

/// On-disk level description: an ASCII map plus its rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelFile {
    pub tile_size: f32,
    /// One string per row; `#` is wall, `.` is floor.
    pub map: Vec<String>,
    #[serde(default)]
    pub rooms: Vec<RoomRect>,
}

impl LevelFile {
    pub fn build(&self) -> Result<GridLevel, ConfigError> {
        let mut level = GridLevel::from_ascii(&self.map.join("\n"), self.tile_size)?;
        for room in &self.rooms {
            let fits = room.x >= 0
                && room.y >= 0
                && room.x + room.width <= level.width()
                && room.y + room.height <= level.height();
            if !fits {
                return Err(ConfigError::RoomOutOfBounds { id: room.id });
            }
            level = level.with_room(*room);
        }
        Ok(level)
    }
}

pub fn parse_level(json: &str) -> Result<GridLevel, ConfigError> {
    let file: LevelFile = serde_json::from_str(json)?;
    file.build()
}

pub fn load_level(path: impl AsRef<Path>) -> Result<GridLevel, ConfigError> {
    let level = parse_level(&read(path.as_ref())?)?;
    log::info!(
        "loaded {}x{} level from {}",
        level.width(),
        level.height(),
        path.as_ref().display()
    );
    Ok(level)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacesim_logic::level::Level;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(r#"{ "hull": { "max_fuel": 250.0 } }"#).unwrap();
        assert_eq!(config.hull.max_fuel, 250.0);
        assert_eq!(config.hull.max_integrity, 100.0);
        assert_eq!(config.ai, SimConfig::default().ai);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = parse_config(r#"{ "hull": { "max_temperature": 1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Tuning(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_config("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("not/here.json"));
    }

    #[test]
    fn test_level_file() {
        let json = serde_json::json!({
            "tile_size": 16.0,
            "map": ["#####", "#...#", "#####"],
            "rooms": [{ "id": 1, "x": 1, "y": 1, "width": 3, "height": 1 }]
        });
        let level = parse_level(&json.to_string()).unwrap();
        assert_eq!(level.width(), 5);
        assert!(level.room_at_world(spacesim_logic::geometry::Vec2::new(24.0, 24.0)).is_some());
    }

    #[test]
    fn test_room_outside_map_rejected() {
        let json = r#"{
            "tile_size": 16.0,
            "map": ["...", "..."],
            "rooms": [{ "id": 7, "x": 1, "y": 0, "width": 5, "height": 1 }]
        }"#;
        assert!(matches!(
            parse_level(json),
            Err(ConfigError::RoomOutOfBounds { id: 7 })
        ));
    }
}
