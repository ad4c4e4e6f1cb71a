//! Scene driving
//!
//! A container does not own a clock or a viewport: the update phases read
//! them from a [`SceneDriver`]. [`RuntimeScene`] is the driver used by games,
//! [`SceneFrame`] a fixed one for tools and tests.

mod runtime_scene;

pub use runtime_scene::{RuntimeScene, SceneStats};

/// Frame information read by the container update phases
pub trait SceneDriver {
    /// Time since the previous frame, in milliseconds, after time scaling
    fn elapsed_time_ms(&self) -> f64;

    /// Width of the game resolution
    fn viewport_width(&self) -> f32;

    /// Height of the game resolution
    fn viewport_height(&self) -> f32;
}

/// Fixed frame information
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFrame {
    elapsed_time_ms: f64,
    viewport_width: f32,
    viewport_height: f32,
}

impl SceneFrame {
    /// Create frame information
    pub fn new(elapsed_time_ms: f64, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            elapsed_time_ms,
            viewport_width,
            viewport_height,
        }
    }
}

impl SceneDriver for SceneFrame {
    fn elapsed_time_ms(&self) -> f64 {
        self.elapsed_time_ms
    }

    fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }
}
