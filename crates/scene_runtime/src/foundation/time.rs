//! Time management utilities

/// Default minimal frame rate used to clamp long frames
pub const DEFAULT_MINIMAL_FRAMERATE: f64 = 10.0;

/// Frame clock for a scene
///
/// Elapsed times are expressed in milliseconds, as provided by the game loop.
/// A frame longer than `1000 / minimal_framerate` is clamped so that a stall
/// (debugger, window drag) does not teleport every object.
#[derive(Debug, Clone)]
pub struct TimeManager {
    elapsed_time: f64,
    time_scale: f64,
    time_from_start: f64,
    first_frame: bool,
    frame_count: u64,
}

impl Default for TimeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeManager {
    /// Create a new time manager
    pub fn new() -> Self {
        Self {
            elapsed_time: 0.0,
            time_scale: 1.0,
            time_from_start: 0.0,
            first_frame: true,
            frame_count: 0,
        }
    }

    /// Reset the clock (called when a scene is loaded)
    pub fn reset(&mut self) {
        *self = Self {
            time_scale: self.time_scale,
            ..Self::new()
        };
    }

    /// Update the clock (should be called once per frame)
    pub fn update(&mut self, elapsed_time: f64, minimal_framerate: f64) {
        if self.frame_count > 0 {
            self.first_frame = false;
        }
        let mut elapsed = elapsed_time;
        if minimal_framerate > 0.0 {
            elapsed = elapsed.min(1000.0 / minimal_framerate);
        }
        self.elapsed_time = elapsed.max(0.0) * self.time_scale;
        self.time_from_start += self.elapsed_time;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in milliseconds
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// Get the total scaled time since the scene started, in milliseconds
    pub fn time_from_start(&self) -> f64 {
        self.time_from_start
    }

    /// Check if the current frame is the first one since the last reset
    pub fn is_first_frame(&self) -> bool {
        self.first_frame
    }

    /// Get the number of frames since the last reset
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the global time scale
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set the global time scale (negative values are ignored)
    pub fn set_time_scale(&mut self, time_scale: f64) {
        if time_scale >= 0.0 {
            self.time_scale = time_scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_frame_flag() {
        let mut time = TimeManager::new();
        time.update(16.0, DEFAULT_MINIMAL_FRAMERATE);
        assert!(time.is_first_frame());
        time.update(16.0, DEFAULT_MINIMAL_FRAMERATE);
        assert!(!time.is_first_frame());
        assert_eq!(time.frame_count(), 2);
    }

    #[test]
    fn test_elapsed_time_is_clamped() {
        let mut time = TimeManager::new();
        time.update(5000.0, 10.0);
        assert_relative_eq!(time.elapsed_time(), 100.0);
    }

    #[test]
    fn test_time_scale() {
        let mut time = TimeManager::new();
        time.set_time_scale(0.5);
        time.update(20.0, DEFAULT_MINIMAL_FRAMERATE);
        assert_relative_eq!(time.elapsed_time(), 10.0);
        assert_relative_eq!(time.time_from_start(), 10.0);

        time.set_time_scale(-1.0);
        assert_relative_eq!(time.time_scale(), 0.5);

        time.reset();
        assert_relative_eq!(time.time_scale(), 0.5);
        assert!(time.is_first_frame());
    }
}
