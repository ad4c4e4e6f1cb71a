//! Object timers

/// A named stopwatch counting elapsed frame time, in milliseconds
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    name: String,
    time: f64,
    paused: bool,
}

impl Timer {
    /// Create a stopped-at-zero, running timer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time: 0.0,
            paused: false,
        }
    }

    /// Get the timer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add elapsed time, unless paused
    pub fn update_time(&mut self, elapsed_time: f64) {
        if !self.paused {
            self.time += elapsed_time;
        }
    }

    /// Reset the timer to zero
    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    /// Pause or resume the timer
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Check if the timer is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Get the accumulated time in milliseconds
    pub fn time(&self) -> f64 {
        self.time
    }
}
