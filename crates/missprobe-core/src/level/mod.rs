//! Read-only level model consumed by hit association.
//!
//! Levels are usually built from a [`LevelDefinition`] (JSON), but can also
//! be assembled target by target with [`Level::add_target`].

mod definition;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::playfield;
use crate::error::Result;
use crate::geometry::Point;

pub use definition::{BreakDefinition, LevelDefinition, TargetDefinition};

/// Shape-specific data of a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetKind {
    Circle,
    Slider {
        /// Number of passes along the path
        repeat_count: u32,
        /// Total slider duration over all passes (ms)
        duration: f64,
        /// Path points after the head, in playfield coordinates
        path: Vec<Point>,
    },
    Spinner {
        end_time: f64,
    },
}

impl TargetKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::Slider { .. } => "Slider",
            Self::Spinner { .. } => "Spinner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub kind: TargetKind,
    /// ms
    pub start_time: f64,
    pub position: Point,
    /// Acceptance radius (px)
    pub radius: f64,
}

impl Target {
    pub fn circle(start_time: f64, position: Point, radius: f64) -> Self {
        Self {
            kind: TargetKind::Circle,
            start_time,
            position,
            radius,
        }
    }

    pub fn slider(
        start_time: f64,
        position: Point,
        radius: f64,
        repeat_count: u32,
        duration: f64,
        path: Vec<Point>,
    ) -> Self {
        Self {
            kind: TargetKind::Slider {
                repeat_count,
                duration,
                path,
            },
            start_time,
            position,
            radius,
        }
    }

    pub fn spinner(start_time: f64, end_time: f64) -> Self {
        Self {
            kind: TargetKind::Spinner { end_time },
            start_time,
            position: Point::new(playfield::WIDTH / 2.0, playfield::HEIGHT / 2.0),
            radius: 0.0,
        }
    }

    pub fn is_circle(&self) -> bool {
        matches!(self.kind, TargetKind::Circle)
    }

    pub fn is_slider(&self) -> bool {
        matches!(self.kind, TargetKind::Slider { .. })
    }

    pub fn is_spinner(&self) -> bool {
        matches!(self.kind, TargetKind::Spinner { .. })
    }

    pub fn distance_to_center(&self, point: Point) -> f64 {
        self.position.distance_to(point)
    }

    /// Whether `point` lies inside the acceptance circle, edge included
    pub fn contains_point(&self, point: Point) -> bool {
        self.distance_to_center(point) <= self.radius
    }

    /// Duration of a single slider pass
    pub fn repeat_duration(&self) -> Option<f64> {
        match &self.kind {
            TargetKind::Slider {
                repeat_count,
                duration,
                ..
            } => Some(duration / f64::from((*repeat_count).max(1))),
            _ => None,
        }
    }

    pub fn end_time(&self) -> f64 {
        match &self.kind {
            TargetKind::Circle => self.start_time,
            TargetKind::Slider { duration, .. } => self.start_time + duration,
            TargetKind::Spinner { end_time } => *end_time,
        }
    }

    /// Length of the slider polyline, 0 for other kinds
    pub fn path_length(&self) -> f64 {
        match &self.kind {
            TargetKind::Slider { path, .. } => {
                let mut last = self.position;
                path.iter()
                    .map(|&p| {
                        let step = last.distance_to(p);
                        last = p;
                        step
                    })
                    .sum()
            }
            _ => 0.0,
        }
    }

    /// Point reached after travelling `distance` along the slider path from
    /// the head, clamped to the path ends. Non-sliders stay at their position.
    pub fn position_at_distance(&self, distance: f64) -> Point {
        let TargetKind::Slider { path, .. } = &self.kind else {
            return self.position;
        };

        let mut remaining = distance.max(0.0);
        let mut from = self.position;
        for &to in path {
            let segment = from.distance_to(to);
            if segment > 0.0 && remaining <= segment {
                return from.lerp(to, remaining / segment);
            }
            remaining -= segment;
            from = to;
        }
        from
    }

    pub fn flip_vertical(&mut self) {
        self.position = self.position.flipped_vertically();
        if let TargetKind::Slider { path, .. } = &mut self.kind {
            for point in path.iter_mut() {
                *point = point.flipped_vertically();
            }
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}ms {}",
            self.kind.name(),
            self.start_time,
            self.position
        )
    }
}

/// Pause interval during which presses are not counted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakPeriod {
    pub start_time: f64,
    pub end_time: f64,
}

impl BreakPeriod {
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    pub overall_difficulty: f64,
    pub circle_size: f64,
    /// Content hash matched against the replay's map hash
    pub hash: Option<String>,
    targets: Vec<Target>,
    breaks: Vec<BreakPeriod>,
    flipped: bool,
}

impl Level {
    pub fn new(overall_difficulty: f64, circle_size: f64) -> Self {
        Self {
            overall_difficulty,
            circle_size,
            hash: None,
            targets: Vec::new(),
            breaks: Vec::new(),
            flipped: false,
        }
    }

    /// `54.4 - 4.48 * cs`
    pub fn radius_for_circle_size(circle_size: f64) -> f64 {
        playfield::RADIUS_BASE - playfield::RADIUS_STEP * circle_size
    }

    pub fn circle_radius(&self) -> f64 {
        Self::radius_for_circle_size(self.circle_size)
    }

    /// Insert keeping start-time order; equal start times keep insertion order
    pub fn add_target(&mut self, target: Target) {
        let at = self
            .targets
            .partition_point(|t| t.start_time <= target.start_time);
        self.targets.insert(at, target);
    }

    pub fn add_break(&mut self, period: BreakPeriod) {
        let at = self
            .breaks
            .partition_point(|b| b.start_time <= period.start_time);
        self.breaks.insert(at, period);
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn breaks(&self) -> &[BreakPeriod] {
        &self.breaks
    }

    pub fn spinners(&self) -> impl Iterator<Item = &Target> + '_ {
        self.targets.iter().filter(|t| t.is_spinner())
    }

    /// Targets hit association classifies (everything except spinners)
    pub fn scored_target_count(&self) -> usize {
        self.targets.iter().filter(|t| !t.is_spinner()).count()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Mirror every target about the playfield's horizontal center line
    pub fn flip_vertical(&mut self) {
        self.flipped = !self.flipped;
        for target in &mut self.targets {
            target.flip_vertical();
        }
        info!("Flipped level vertically (flipped = {})", self.flipped);
    }

    pub fn from_json_str(json: &str) -> Result<Level> {
        let definition: LevelDefinition = serde_json::from_str(json)?;
        Ok(definition.into_level())
    }

    /// Load a JSON level definition from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Level> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_json_str(&content)?;
        debug!(
            "Loaded level {} with {} targets and {} breaks",
            path.as_ref().display(),
            level.targets.len(),
            level.breaks.len()
        );
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider() -> Target {
        Target::slider(
            1000.0,
            Point::new(0.0, 0.0),
            30.0,
            2,
            600.0,
            vec![Point::new(100.0, 0.0), Point::new(100.0, 50.0)],
        )
    }

    #[test]
    fn test_contains_point_includes_edge() {
        let target = Target::circle(0.0, Point::new(100.0, 100.0), 10.0);
        assert!(target.contains_point(Point::new(100.0, 100.0)));
        assert!(target.contains_point(Point::new(110.0, 100.0)));
        assert!(!target.contains_point(Point::new(110.5, 100.0)));
    }

    #[test]
    fn test_slider_geometry() {
        let target = slider();
        assert_eq!(target.repeat_duration(), Some(300.0));
        assert_eq!(target.end_time(), 1600.0);
        assert_eq!(target.path_length(), 150.0);
        assert_eq!(target.position_at_distance(50.0), Point::new(50.0, 0.0));
        assert_eq!(target.position_at_distance(125.0), Point::new(100.0, 25.0));
        assert_eq!(target.position_at_distance(500.0), Point::new(100.0, 50.0));
        assert_eq!(target.position_at_distance(-5.0), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_circle_has_no_repeat_duration() {
        let target = Target::circle(500.0, Point::new(0.0, 0.0), 10.0);
        assert_eq!(target.repeat_duration(), None);
        assert_eq!(target.end_time(), 500.0);
        assert_eq!(target.position_at_distance(40.0), target.position);
    }

    #[test]
    fn test_targets_stay_sorted() {
        let mut level = Level::new(8.0, 4.0);
        level.add_target(Target::circle(300.0, Point::default(), 10.0));
        level.add_target(Target::circle(100.0, Point::default(), 10.0));
        level.add_target(Target::spinner(200.0, 250.0));

        let starts: Vec<f64> = level.targets().iter().map(|t| t.start_time).collect();
        assert_eq!(starts, vec![100.0, 200.0, 300.0]);
        assert_eq!(level.scored_target_count(), 2);
        assert_eq!(level.spinners().count(), 1);
    }

    #[test]
    fn test_circle_radius_from_size() {
        let level = Level::new(8.0, 4.0);
        assert!((level.circle_radius() - 36.48).abs() < 1e-9);
    }

    #[test]
    fn test_flip_moves_slider_path() {
        let mut level = Level::new(8.0, 4.0);
        level.add_target(slider());
        level.flip_vertical();

        assert!(level.is_flipped());
        let target = &level.targets()[0];
        assert_eq!(target.position, Point::new(0.0, 384.0));
        assert_eq!(target.position_at_distance(150.0), Point::new(100.0, 334.0));

        level.flip_vertical();
        assert!(!level.is_flipped());
        assert_eq!(level.targets()[0], slider());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        std::fs::write(
            &path,
            r#"{"overall_difficulty": 9, "circle_size": 4,
                "targets": [{"type": "circle", "start_time": 1000, "x": 64, "y": 64}]}"#,
        )
        .unwrap();

        let level = Level::load(&path).unwrap();
        assert_eq!(level.targets().len(), 1);
        assert_eq!(level.overall_difficulty, 9.0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Level::load("/nonexistent/level.json").unwrap_err();
        assert!(err.is_not_found());
    }
}
