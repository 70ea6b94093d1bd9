//! Line-of-sight and view-cone perception.

use crate::config::AiTuning;
use crate::geometry::{angle_difference, Vec2};
use crate::level::Level;

/// How far an AI can see.
///
/// Constant while aggro. Otherwise it shrinks as the scene fills up, so a
/// crowded scene spends less on sight checks, bottoming out at the minimum.
pub fn view_distance(ship_count: usize, aggro: bool, tuning: &AiTuning) -> f32 {
    if aggro {
        return tuning.aggro_view_distance;
    }
    let shrink = ship_count as f32 * tuning.view_distance_per_ship;
    (tuning.base_view_distance - shrink).max(tuning.min_view_distance)
}

/// Whether `target` lies within `distance` and within `half_angle` of the
/// direction `facing` points.
pub fn in_view_cone(from: Vec2, facing: f32, target: Vec2, distance: f32, half_angle: f32) -> bool {
    if from.distance_squared(&target) > distance * distance {
        return false;
    }
    if from == target {
        return true;
    }
    angle_difference(facing, from.angle_to(&target)).abs() <= half_angle
}

/// Cone test plus a wall ray test against the level.
pub fn can_see(
    level: &dyn Level,
    from: Vec2,
    facing: f32,
    target: Vec2,
    distance: f32,
    half_angle: f32,
) -> bool {
    in_view_cone(from, facing, target, distance, half_angle)
        && !level.is_wall_obscuring(from, target)
}
