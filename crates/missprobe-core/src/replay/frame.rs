use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::replay::{KeyCounter, Keys};

/// One decoded input sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Milliseconds since the previous frame
    pub time_delta: i32,
    /// Running sum of deltas
    pub time: i32,
    pub x: f32,
    pub y: f32,
    pub keys: Keys,
    /// Combo at this frame, filled in by hit association
    pub combo: u32,
    /// Eligible presses so far, filled in by hit association
    pub key_counter: KeyCounter,
    // Kinematics, only set on frames with a positive delta
    pub travelled_distance: f64,
    pub travelled_distance_delta: f64,
    pub speed: f64,
    pub acceleration: f64,
}

impl ReplayFrame {
    pub fn new(time_delta: i32, time: i32, x: f32, y: f32, keys: Keys) -> Self {
        Self {
            time_delta,
            time,
            x,
            y,
            keys,
            ..Default::default()
        }
    }

    pub fn position(&self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }

    /// Held-key repeats share a timestamp with the previous frame
    pub fn is_repeat(&self) -> bool {
        self.time_delta <= 0
    }
}

impl fmt::Display for ReplayFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}): ({},{}) {} {}",
            self.time, self.time_delta, self.x, self.y, self.keys, self.travelled_distance_delta
        )
    }
}

/// Life bar sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LifeFrame {
    pub time: i32,
    pub percentage: f32,
}
