//! Pixel perfectness of a press relative to a target.
//!
//! `1 - distance / radius`: 1 at the center, 0 on the edge of the
//! acceptance circle, negative outside it. Presses outside the circle never
//! score above 1, so a larger value always means a press closer to the center.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::geometry::Point;
use crate::level::Target;

pub fn perfectness(target: &Target, point: Point) -> f64 {
    if target.radius <= 0.0 {
        return f64::NEG_INFINITY;
    }
    1.0 - target.distance_to_center(point) / target.radius
}

/// Memoized perfectness keyed by (frame index, target index).
///
/// Values are computed on first request and never recomputed.
#[derive(Debug, Default)]
pub struct PerfectnessCache {
    values: Mutex<HashMap<(usize, usize), f64>>,
}

impl PerfectnessCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&self, frame: usize, target: usize, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        *values.entry((frame, target)).or_insert_with(compute)
    }

    pub fn len(&self) -> usize {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target {
        Target::circle(0.0, Point::new(100.0, 100.0), 40.0)
    }

    #[test]
    fn test_center_is_one() {
        assert!((perfectness(&target(), Point::new(100.0, 100.0)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_is_zero() {
        assert!(perfectness(&target(), Point::new(140.0, 100.0)).abs() < 1e-9);
        assert!(perfectness(&target(), Point::new(100.0, 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_outside_is_negative() {
        assert!(perfectness(&target(), Point::new(180.0, 100.0)) < 0.0);
    }

    #[test]
    fn test_cache_computes_once() {
        let cache = PerfectnessCache::new();
        let mut calls = 0;
        let first = cache.get_or_compute(3, 1, || {
            calls += 1;
            0.75
        });
        let second = cache.get_or_compute(3, 1, || {
            calls += 1;
            0.0
        });
        assert_eq!(first, 0.75);
        assert_eq!(second, 0.75);
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }
}
