//! Neighbourhood of a missed target, as plain data for a renderer.

use serde::{Deserialize, Serialize};

use crate::constants::context::{HALF_HEIGHT, HALF_WIDTH};
use crate::geometry::Point;
use crate::level::{Level, Target};
use crate::replay::{Keys, Replay, detect_presses};

use super::judgement::{HitJudgement, JudgementWindows};

/// Samples taken along a slider path
const SLIDER_SAMPLES: usize = 16;

/// Axis-aligned box around the miss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextBounds {
    pub min: Point,
    pub max: Point,
}

impl ContextBounds {
    pub fn around(center: Point) -> Self {
        Self {
            min: Point::new(center.x - HALF_WIDTH, center.y - HALF_HEIGHT),
            max: Point::new(center.x + HALF_WIDTH, center.y + HALF_HEIGHT),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextTarget {
    pub index: usize,
    pub kind: String,
    pub start_time: f64,
    pub position: Point,
    pub radius: f64,
    /// Sampled slider body, empty for other kinds
    pub path: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextFrame {
    pub index: usize,
    pub time: i32,
    pub position: Point,
    pub keys: Keys,
    /// Whether a new press happened on this frame
    pub is_press: bool,
    /// Judgement the frame's timing would earn against the missed target
    pub judgement: HitJudgement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissContext {
    /// Index of the missed target
    pub target: usize,
    pub start_time: f64,
    pub position: Point,
    pub bounds: ContextBounds,
    pub targets: Vec<ContextTarget>,
    pub frames: Vec<ContextFrame>,
}

fn sample_path(target: &Target) -> Vec<Point> {
    if !target.is_slider() {
        return Vec::new();
    }
    let length = target.path_length();
    (0..=SLIDER_SAMPLES)
        .map(|i| target.position_at_distance(length * i as f64 / SLIDER_SAMPLES as f64))
        .collect()
}

/// Targets and frames near `target_index` in both time and space.
///
/// Neighbouring targets are collected outward from the miss while they stay
/// inside the bounds and within `span_ms`; frames likewise, starting from the
/// first and last collected target.
pub fn miss_context(
    level: &Level,
    replay: &Replay,
    target_index: usize,
    span_ms: f64,
) -> Option<MissContext> {
    let targets = level.targets();
    let miss = targets.get(target_index)?;
    let bounds = ContextBounds::around(miss.position);
    let near = |t: &Target| bounds.contains(t.position) && (t.start_time - miss.start_time).abs() < span_ms;

    let mut first = target_index;
    while first > 0 && near(&targets[first - 1]) {
        first -= 1;
    }
    let mut last = target_index;
    while last + 1 < targets.len() && near(&targets[last + 1]) {
        last += 1;
    }

    let context_targets = (first..=last)
        .map(|i| ContextTarget {
            index: i,
            kind: targets[i].kind.name().to_string(),
            start_time: targets[i].start_time,
            position: targets[i].position,
            radius: targets[i].radius,
            path: sample_path(&targets[i]),
        })
        .collect();

    let frames = replay.frames();
    let mut context_frames = Vec::new();
    if !frames.is_empty() {
        let miss_time = miss.start_time;
        let in_range = |i: usize| {
            let f = &frames[i];
            bounds.contains(f.position()) && (f64::from(f.time) - miss_time).abs() < span_ms
        };

        let last_frame = frames.len() - 1;
        let mut lo = frames
            .partition_point(|f| f64::from(f.time) <= targets[first].start_time)
            .min(last_frame);
        while lo > 0 && in_range(lo) {
            lo -= 1;
        }
        let mut hi = frames
            .partition_point(|f| f64::from(f.time) <= targets[last].start_time)
            .min(last_frame);
        while hi < last_frame && in_range(hi) {
            hi += 1;
        }

        let windows = JudgementWindows::from_od(level.overall_difficulty);
        for i in lo..=hi {
            let frame = &frames[i];
            let previous = if i > 0 { frames[i - 1].keys } else { Keys::NONE };
            context_frames.push(ContextFrame {
                index: i,
                time: frame.time,
                position: frame.position(),
                keys: frame.keys,
                is_press: !detect_presses(previous, frame.keys).is_empty(),
                judgement: windows.judge(f64::from(frame.time) - miss_time),
            });
        }
    }

    Some(MissContext {
        target: target_index,
        start_time: miss.start_time,
        position: miss.position,
        bounds,
        targets: context_targets,
        frames: context_frames,
    })
}
