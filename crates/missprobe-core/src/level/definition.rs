use serde::{Deserialize, Serialize};

use crate::constants::playfield;
use crate::geometry::Point;

use super::{BreakPeriod, Level, Target, TargetKind};

fn center_x() -> f64 {
    playfield::WIDTH / 2.0
}

fn center_y() -> f64 {
    playfield::HEIGHT / 2.0
}

/// On-disk JSON form of a level
///
/// ```json
/// {
///   "hash": "d41d8cd98f00b204e9800998ecf8427e",
///   "overall_difficulty": 8,
///   "circle_size": 4,
///   "targets": [
///     { "type": "circle", "start_time": 1000, "x": 256, "y": 192 },
///     { "type": "slider", "start_time": 1500, "x": 100, "y": 100,
///       "repeat_count": 1, "duration": 400, "path": [{ "x": 200, "y": 100 }] },
///     { "type": "spinner", "start_time": 2500, "end_time": 4000 }
///   ],
///   "breaks": [{ "start_time": 5000, "end_time": 9000 }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    #[serde(default)]
    pub hash: Option<String>,
    pub overall_difficulty: f64,
    pub circle_size: f64,
    #[serde(default)]
    pub targets: Vec<TargetDefinition>,
    #[serde(default)]
    pub breaks: Vec<BreakDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDefinition {
    pub start_time: f64,
    #[serde(default = "center_x")]
    pub x: f64,
    #[serde(default = "center_y")]
    pub y: f64,
    /// Overrides the radius derived from circle size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(flatten)]
    pub kind: TargetKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakDefinition {
    pub start_time: f64,
    pub end_time: f64,
}

impl LevelDefinition {
    pub fn into_level(self) -> Level {
        let mut level = Level::new(self.overall_difficulty, self.circle_size);
        level.hash = self.hash;
        let radius = level.circle_radius();

        for target in self.targets {
            level.add_target(Target {
                kind: target.kind,
                start_time: target.start_time,
                position: Point::new(target.x, target.y),
                radius: target.radius.unwrap_or(radius),
            });
        }

        for period in self.breaks {
            level.add_break(BreakPeriod {
                start_time: period.start_time,
                end_time: period.end_time,
            });
        }

        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "hash": "abc",
        "overall_difficulty": 8,
        "circle_size": 4,
        "targets": [
            { "type": "spinner", "start_time": 2500, "end_time": 4000 },
            { "type": "circle", "start_time": 1000, "x": 256, "y": 192 },
            { "type": "slider", "start_time": 1500, "x": 100, "y": 100, "radius": 20,
              "repeat_count": 1, "duration": 400, "path": [{ "x": 200, "y": 100 }] }
        ],
        "breaks": [{ "start_time": 5000, "end_time": 9000 }]
    }"#;

    #[test]
    fn test_parse_level_definition() {
        let level = Level::from_json_str(LEVEL).unwrap();

        assert_eq!(level.hash.as_deref(), Some("abc"));
        assert_eq!(level.targets().len(), 3);
        assert!(level.targets()[0].is_circle());
        assert!(level.targets()[1].is_slider());
        assert!(level.targets()[2].is_spinner());
        assert_eq!(level.targets()[1].radius, 20.0);
        assert!((level.targets()[0].radius - 36.48).abs() < 1e-9);
        assert_eq!(level.targets()[2].position, Point::new(256.0, 192.0));
        assert_eq!(level.breaks().len(), 1);
        assert!(level.breaks()[0].contains(6000.0));
    }

    #[test]
    fn test_unknown_target_type_is_rejected() {
        let json = r#"{"overall_difficulty": 5, "circle_size": 4,
                       "targets": [{"type": "hold", "start_time": 0}]}"#;
        let err = Level::from_json_str(json).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }
}
