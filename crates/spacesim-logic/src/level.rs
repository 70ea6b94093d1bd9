//! The level boundary the AI and the simulation consume.
//!
//! Level generation belongs to the host; the simulation only asks the
//! questions in [`Level`]. [`GridLevel`] is a plain tile grid answering
//! them, used by the headless harness and the tests.
//!
//! ```
//! use spacesim_logic::level::{GridLevel, Level, RoomRect};
//! use spacesim_logic::geometry::Vec2;
//!
//! let level = GridLevel::from_ascii("#####\n#...#\n#####", 32.0)
//!     .unwrap()
//!     .with_room(RoomRect::new(1, 1, 1, 3, 1));
//! assert!(level.room_at_world(Vec2::new(48.0, 48.0)).is_some());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Vec2;
use crate::pathfinding::{find_tile_path, TileCoord};

/// Upper bound on BFS expansion per path request.
const MAX_PATH_NODES: usize = 4096;

/// A rectangular room in tile coordinates (inclusive of `x..x+width`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRect {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RoomRect {
    pub fn new(id: u32, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        tile.x >= self.x
            && tile.x < self.x + self.width
            && tile.y >= self.y
            && tile.y < self.y + self.height
    }

    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| TileCoord::new(x, y)))
    }

    pub fn area(&self) -> i32 {
        self.width.max(0) * self.height.max(0)
    }
}

/// Queries the simulation makes against the level.
pub trait Level {
    /// The room containing a world position, if any.
    fn room_at_world(&self, position: Vec2) -> Option<RoomRect>;
    /// The tile under a world position; `None` outside the map.
    fn tile_at_world(&self, position: Vec2) -> Option<TileCoord>;
    /// World-space centre of a tile.
    fn tile_to_world(&self, tile: TileCoord) -> Vec2;
    fn is_within_tile(&self, position: Vec2, tile: TileCoord) -> bool;
    fn is_walkable(&self, tile: TileCoord) -> bool;
    /// Tiles to visit from `from` to `to`, excluding `from`.
    fn find_path(&self, from: TileCoord, to: TileCoord) -> Option<Vec<TileCoord>>;
    /// True when a wall tile lies on the segment between two world positions.
    fn is_wall_obscuring(&self, from: Vec2, to: Vec2) -> bool;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("level map is empty")]
    Empty,
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unexpected character {ch:?} at row {row}, column {column}")]
    UnknownTile { ch: char, row: usize, column: usize },
    #[error("tile size must be positive")]
    BadTileSize,
}

/// Tile grid with walls and rectangular rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridLevel {
    width: i32,
    height: i32,
    tile_size: f32,
    walls: Vec<bool>,
    rooms: Vec<RoomRect>,
}

impl GridLevel {
    /// Open floor of `width` x `height` tiles with no walls and no rooms.
    pub fn open(width: i32, height: i32, tile_size: f32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tile_size,
            walls: vec![false; (width * height) as usize],
            rooms: Vec::new(),
        }
    }

    /// Parse a map where `#` is wall and `.` is floor. Leading whitespace on
    /// each line is ignored so maps can be indented in source.
    pub fn from_ascii(map: &str, tile_size: f32) -> Result<Self, LevelError> {
        if tile_size <= 0.0 {
            return Err(LevelError::BadTileSize);
        }
        let rows: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(LevelError::Empty);
        };
        let expected = first.chars().count();

        let mut walls = Vec::with_capacity(expected * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(LevelError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }
            for (column, ch) in line.chars().enumerate() {
                match ch {
                    '#' => walls.push(true),
                    '.' => walls.push(false),
                    other => {
                        return Err(LevelError::UnknownTile {
                            ch: other,
                            row,
                            column,
                        })
                    }
                }
            }
        }

        Ok(Self {
            width: expected as i32,
            height: rows.len() as i32,
            tile_size,
            walls,
            rooms: Vec::new(),
        })
    }

    pub fn with_room(mut self, room: RoomRect) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn set_wall(&mut self, tile: TileCoord, wall: bool) {
        if let Some(idx) = self.index(tile) {
            self.walls[idx] = wall;
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn rooms(&self) -> &[RoomRect] {
        &self.rooms
    }

    pub fn is_wall(&self, tile: TileCoord) -> bool {
        self.index(tile).map(|i| self.walls[i]).unwrap_or(true)
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.width || tile.y >= self.height {
            None
        } else {
            Some((tile.y * self.width + tile.x) as usize)
        }
    }

    /// Tiles crossed by a line between two tiles (Bresenham, inclusive).
    fn line_tiles(a: TileCoord, b: TileCoord) -> Vec<TileCoord> {
        let mut tiles = Vec::new();
        let (mut x, mut y) = (a.x, a.y);
        let dx = (b.x - a.x).abs();
        let dy = -(b.y - a.y).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            tiles.push(TileCoord::new(x, y));
            if x == b.x && y == b.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        tiles
    }

    fn world_to_tile_unchecked(&self, position: Vec2) -> TileCoord {
        TileCoord::new(
            (position.x / self.tile_size).floor() as i32,
            (position.y / self.tile_size).floor() as i32,
        )
    }
}

impl Level for GridLevel {
    fn room_at_world(&self, position: Vec2) -> Option<RoomRect> {
        let tile = self.tile_at_world(position)?;
        self.rooms.iter().find(|r| r.contains(tile)).copied()
    }

    fn tile_at_world(&self, position: Vec2) -> Option<TileCoord> {
        let tile = self.world_to_tile_unchecked(position);
        self.index(tile).map(|_| tile)
    }

    fn tile_to_world(&self, tile: TileCoord) -> Vec2 {
        Vec2::new(
            (tile.x as f32 + 0.5) * self.tile_size,
            (tile.y as f32 + 0.5) * self.tile_size,
        )
    }

    fn is_within_tile(&self, position: Vec2, tile: TileCoord) -> bool {
        self.world_to_tile_unchecked(position) == tile
    }

    fn is_walkable(&self, tile: TileCoord) -> bool {
        !self.is_wall(tile)
    }

    fn find_path(&self, from: TileCoord, to: TileCoord) -> Option<Vec<TileCoord>> {
        find_tile_path(from, to, MAX_PATH_NODES, |t| self.is_walkable(t))
    }

    fn is_wall_obscuring(&self, from: Vec2, to: Vec2) -> bool {
        let a = self.world_to_tile_unchecked(from);
        let b = self.world_to_tile_unchecked(to);
        Self::line_tiles(a, b).into_iter().any(|t| self.is_wall(t))
    }
}
