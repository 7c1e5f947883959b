//! Fixture builders shared by unit tests.

use crate::geometry::Point;
use crate::level::{BreakPeriod, Level, Target};
use crate::replay::{Keys, Mods, Replay, ReplayHeader};

/// Replay from absolute-time samples, kinematics computed
pub(crate) fn replay_from(samples: &[(i32, f32, f32, Keys)], mods: Mods) -> Replay {
    let header = ReplayHeader {
        mods,
        player_name: Some("fixture".to_string()),
        ..Default::default()
    };
    let mut replay = Replay::new(header);
    let mut last_time = 0;
    for &(time, x, y, keys) in samples {
        replay.push_frame(time - last_time, x, y, keys);
        last_time = time;
    }
    replay.compute_kinematics();
    replay
}

/// Level of circles `(start_time, x, y)` at OD 5 / CS 4 (W = 199.5, r = 36.48)
pub(crate) fn circles(targets: &[(f64, f64, f64)]) -> Level {
    let mut level = Level::new(5.0, 4.0);
    let radius = level.circle_radius();
    for &(time, x, y) in targets {
        level.add_target(Target::circle(time, Point::new(x, y), radius));
    }
    level
}

pub(crate) fn with_break(mut level: Level, start_time: f64, end_time: f64) -> Level {
    level.add_break(BreakPeriod {
        start_time,
        end_time,
    });
    level
}

/// Four circles; the third is never approached and never pressed near
pub(crate) fn four_target_scenario() -> (Level, Replay) {
    let level = circles(&[
        (1000.0, 100.0, 100.0),
        (2000.0, 200.0, 200.0),
        (3000.0, 400.0, 300.0),
        (4000.0, 300.0, 100.0),
    ]);
    let replay = replay_from(
        &[
            (900, 100.0, 100.0, Keys::NONE),
            (1000, 100.0, 100.0, Keys::K1),
            (1100, 120.0, 120.0, Keys::NONE),
            (1900, 200.0, 200.0, Keys::NONE),
            (2010, 205.0, 200.0, Keys::M1),
            (2100, 200.0, 200.0, Keys::NONE),
            (2900, 200.0, 200.0, Keys::NONE),
            (3100, 210.0, 190.0, Keys::NONE),
            (3950, 300.0, 100.0, Keys::NONE),
            (4005, 301.0, 100.0, Keys::K2),
            (4100, 300.0, 120.0, Keys::NONE),
        ],
        Mods::NONE,
    );
    (level, replay)
}
