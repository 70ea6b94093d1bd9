//! Movement system - integrates ship velocity against the level's walls.

use hecs::World;
use spacesim_logic::constants::physics::STEP_MS;
use spacesim_logic::geometry::Vec2;
use spacesim_logic::level::Level;

use crate::components::Body;

/// Move every active ship. A ship whose next position would land outside
/// the map or on an unwalkable tile stops dead where it is.
pub fn movement_system(world: &mut World, level: &dyn Level, delta: f64) {
    let steps = (delta / STEP_MS) as f32;
    for (_, body) in world.query_mut::<&mut Body>() {
        if !body.active || body.velocity == Vec2::ZERO {
            continue;
        }
        let next = body.position + body.velocity * steps;
        match level.tile_at_world(next) {
            Some(tile) if level.is_walkable(tile) => body.position = next,
            _ => body.velocity = Vec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacesim_logic::level::GridLevel;
    use spacesim_logic::pathfinding::TileCoord;

    #[test]
    fn test_moves_one_step() {
        let level = GridLevel::open(10, 10, 10.0);
        let mut world = World::new();
        let mut body = Body::new(Vec2::new(15.0, 15.0), 2.0, 1.0);
        body.velocity = Vec2::new(2.0, 0.0);
        let e = world.spawn((body,));

        movement_system(&mut world, &level, STEP_MS);
        let body = world.get::<&Body>(e).unwrap();
        assert!((body.position.x - 17.0).abs() < 1e-4);
    }

    #[test]
    fn test_wall_stops_ship() {
        let mut level = GridLevel::open(10, 10, 10.0);
        level.set_wall(TileCoord::new(2, 1), true);
        let mut world = World::new();
        let mut body = Body::new(Vec2::new(19.0, 15.0), 2.0, 1.0);
        body.velocity = Vec2::new(5.0, 0.0);
        let e = world.spawn((body,));

        movement_system(&mut world, &level, STEP_MS);
        let body = world.get::<&Body>(e).unwrap();
        assert_eq!(body.position, Vec2::new(19.0, 15.0));
        assert_eq!(body.velocity, Vec2::ZERO);
    }
}
