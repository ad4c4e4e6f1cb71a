//! Forces moving objects
//!
//! A force is a displacement per second. Its multiplier drives its lifetime:
//! - `0`: instant, applied for a single frame
//! - `1`: permanent, until forces are cleared
//! - anything else: decays every frame by `length * (1 - multiplier) * elapsed`

use crate::foundation::math::Vec2;

/// Length under which a decaying force is discarded
pub const FORCE_LENGTH_EPSILON: f32 = 0.001;

/// A force applied on an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Force {
    vector: Vec2,
    multiplier: f32,
}

impl Force {
    /// Create a force from its components
    pub fn new(x: f32, y: f32, multiplier: f32) -> Self {
        Self {
            vector: Vec2::new(x, y),
            multiplier,
        }
    }

    /// Create a force from an angle in degrees and a length
    pub fn polar(angle_degrees: f32, length: f32, multiplier: f32) -> Self {
        let angle = angle_degrees.to_radians();
        Self::new(angle.cos() * length, angle.sin() * length, multiplier)
    }

    /// Horizontal component
    pub fn x(&self) -> f32 {
        self.vector.x
    }

    /// Vertical component
    pub fn y(&self) -> f32 {
        self.vector.y
    }

    /// Force as a vector
    pub fn vector(&self) -> Vec2 {
        self.vector
    }

    /// Multiplier of the force
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Length of the force
    pub fn length(&self) -> f32 {
        self.vector.norm()
    }

    /// Angle of the force in degrees
    pub fn angle(&self) -> f32 {
        self.vector.y.atan2(self.vector.x).to_degrees()
    }

    /// Change the length of the force, keeping its direction
    pub fn set_length(&mut self, length: f32) {
        let current = self.length();
        if current > 0.0 {
            self.vector *= length / current;
        }
    }

    /// Check if the force never decays
    pub fn is_permanent(&self) -> bool {
        self.multiplier == 1.0
    }

    /// Decay the force over `elapsed_seconds`.
    ///
    /// Returns false when the force must be discarded.
    pub fn decay(&mut self, elapsed_seconds: f32) -> bool {
        if self.is_permanent() {
            return true;
        }
        if self.multiplier == 0.0 || self.length() <= FORCE_LENGTH_EPSILON {
            return false;
        }
        let length = self.length();
        self.set_length(length - length * (1.0 - self.multiplier) * elapsed_seconds);
        true
    }
}
