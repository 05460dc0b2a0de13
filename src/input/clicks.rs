//! Multi-click detection.

use std::time::Duration;

/// Types of pointer activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickType {
    Single,
    /// Selects a word.
    Double,
    /// Selects a line.
    Triple,
}

/// Counts taps that land close together in time and space.
#[derive(Clone, Debug)]
pub struct ClickTracker {
    window: Duration,
    max_distance: f32,
    last_time: Option<Duration>,
    last_position: Option<(f32, f32)>,
    count: u32,
}

impl ClickTracker {
    #[must_use]
    pub fn new(window: Duration, max_distance: f32) -> Self {
        Self {
            window,
            max_distance,
            last_time: None,
            last_position: None,
            count: 0,
        }
    }

    /// Register a press at `(x, y)` at host time `time`.
    pub fn register(&mut self, x: f32, y: f32, time: Duration) -> ClickType {
        let continues = match (self.last_time, self.last_position) {
            (Some(last_time), Some((lx, ly))) => {
                let elapsed = time.saturating_sub(last_time);
                let distance = (x - lx).abs() + (y - ly).abs();
                elapsed <= self.window && distance <= self.max_distance
            }
            _ => false,
        };

        let click = if continues {
            self.count += 1;
            match self.count {
                2 => ClickType::Double,
                3 => {
                    // Reset after triple click
                    self.count = 0;
                    ClickType::Triple
                }
                _ => ClickType::Single,
            }
        } else {
            self.count = 1;
            ClickType::Single
        };

        self.last_time = Some(time);
        self.last_position = Some((x, y));
        click
    }

    /// Forget previous taps.
    pub fn reset(&mut self) {
        self.last_time = None;
        self.last_position = None;
        self.count = 0;
    }
}
