//! Pure BFS pathfinding over a tile grid.
//!
//! The grid itself is abstracted as a walkability predicate so the same
//! search serves [`crate::level::GridLevel`] and any host-provided map.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Integer tile coordinate (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 4-connected neighbours.
    pub fn neighbors(self) -> [TileCoord; 4] {
        [
            TileCoord::new(self.x + 1, self.y),
            TileCoord::new(self.x - 1, self.y),
            TileCoord::new(self.x, self.y + 1),
            TileCoord::new(self.x, self.y - 1),
        ]
    }
}

/// Find a path from `from` to `to` via BFS.
///
/// Returns the tiles to visit in order, excluding `from` and ending at `to`.
/// Returns an empty vec if `from == to`. Returns `None` if `to` is not
/// walkable or unreachable. `max_nodes` bounds the search on large maps.
pub fn find_tile_path<F>(
    from: TileCoord,
    to: TileCoord,
    max_nodes: usize,
    walkable: F,
) -> Option<Vec<TileCoord>>
where
    F: Fn(TileCoord) -> bool,
{
    if from == to {
        return Some(vec![]);
    }
    if !walkable(to) {
        return None;
    }

    let mut came_from: HashMap<TileCoord, TileCoord> = HashMap::new();
    let mut queue: VecDeque<TileCoord> = VecDeque::new();
    came_from.insert(from, from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if came_from.len() > max_nodes {
            return None;
        }
        for next in current.neighbors() {
            if came_from.contains_key(&next) || !walkable(next) {
                continue;
            }
            came_from.insert(next, current);
            if next == to {
                return Some(reconstruct(&came_from, from, to));
            }
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct(
    came_from: &HashMap<TileCoord, TileCoord>,
    from: TileCoord,
    to: TileCoord,
) -> Vec<TileCoord> {
    let mut path = vec![to];
    let mut current = to;
    while let Some(&prev) = came_from.get(&current) {
        if prev == from {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(w: i32, h: i32) -> impl Fn(TileCoord) -> bool {
        move |t: TileCoord| t.x >= 0 && t.y >= 0 && t.x < w && t.y < h
    }

    #[test]
    fn test_same_tile() {
        let path = find_tile_path(TileCoord::new(1, 1), TileCoord::new(1, 1), 100, open(5, 5));
        assert_eq!(path, Some(vec![]));
    }

    #[test]
    fn test_adjacent_tiles() {
        let path =
            find_tile_path(TileCoord::new(1, 1), TileCoord::new(2, 1), 100, open(5, 5)).unwrap();
        assert_eq!(path, vec![TileCoord::new(2, 1)]);
    }

    #[test]
    fn test_multi_hop_is_shortest() {
        let path =
            find_tile_path(TileCoord::new(0, 0), TileCoord::new(3, 2), 100, open(5, 5)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(*path.last().unwrap(), TileCoord::new(3, 2));
        // Each step moves exactly one tile.
        let mut prev = TileCoord::new(0, 0);
        for t in &path {
            assert_eq!((t.x - prev.x).abs() + (t.y - prev.y).abs(), 1);
            prev = *t;
        }
    }

    #[test]
    fn test_routes_around_wall() {
        // Column x=2 is blocked except at y=4.
        let grid = |t: TileCoord| {
            t.x >= 0 && t.y >= 0 && t.x < 5 && t.y < 5 && !(t.x == 2 && t.y < 4)
        };
        let path = find_tile_path(TileCoord::new(0, 0), TileCoord::new(4, 0), 100, grid).unwrap();
        assert!(path.contains(&TileCoord::new(2, 4)));
        assert_eq!(path.len(), 12);
    }

    #[test]
    fn test_unreachable() {
        let grid = |t: TileCoord| t.x >= 0 && t.y >= 0 && t.x < 5 && t.y < 5 && t.x != 2;
        assert_eq!(
            find_tile_path(TileCoord::new(0, 0), TileCoord::new(4, 0), 100, grid),
            None
        );
    }

    #[test]
    fn test_unwalkable_goal() {
        let grid = |t: TileCoord| t != TileCoord::new(3, 3);
        assert_eq!(
            find_tile_path(TileCoord::new(0, 0), TileCoord::new(3, 3), 100, grid),
            None
        );
    }

    #[test]
    fn test_node_budget() {
        let unbounded = |_t: TileCoord| true;
        assert_eq!(
            find_tile_path(TileCoord::new(0, 0), TileCoord::new(50, 50), 64, unbounded),
            None
        );
    }
}
