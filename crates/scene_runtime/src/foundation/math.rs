//! Math utilities and types
//!
//! Provides the small set of 2D math types the runtime needs.

pub use nalgebra::{Rotation2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Axis-aligned bounding box in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a box from a position and a size
    pub fn from_position_and_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Check if the box overlaps a rectangle given as `[left, top, right, bottom]`
    pub fn overlaps_rect(&self, rect: &[f32; 4]) -> bool {
        !(self.min.x > rect[2]
            || self.min.y > rect[3]
            || self.max.x < rect[0]
            || self.max.y < rect[1])
    }
}

/// Convert degrees to radians
pub fn to_radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Rotate a point around an origin by an angle in degrees
pub fn rotate_around(point: Vec2, origin: Vec2, angle_degrees: f32) -> Vec2 {
    if angle_degrees == 0.0 {
        return point;
    }
    let rotation = Rotation2::new(to_radians(angle_degrees));
    origin + rotation * (point - origin)
}
