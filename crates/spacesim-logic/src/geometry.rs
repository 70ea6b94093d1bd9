//! 2D vector math shared by movement, projectiles and line-of-sight.
//!
//! Angles are radians with `0` facing +x and positive angles turning
//! toward +y, matching the screen-space convention of the host.

use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// 2D position / velocity vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle`.
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Angle of the vector from `self` to `target`.
    pub fn angle_to(&self, target: &Self) -> f32 {
        (target.y - self.y).atan2(target.x - self.x)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Wrap an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Smallest signed difference `to - from`, in `(-PI, PI]`.
pub fn angle_difference(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Circle overlap test.
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(&b) <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_angle_is_unit() {
        let v = Vec2::from_angle(1.234);
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_to_cardinal() {
        let o = Vec2::ZERO;
        assert_abs_diff_eq!(o.angle_to(&Vec2::new(10.0, 0.0)), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(o.angle_to(&Vec2::new(0.0, 10.0)), PI / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_difference_wraps() {
        let d = angle_difference(PI - 0.1, -PI + 0.1);
        assert_abs_diff_eq!(d, 0.2, epsilon = 1e-5);
        let d = angle_difference(0.1, -0.1);
        assert_abs_diff_eq!(d, -0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(11.0, 0.0), 5.0));
    }
}
