//! Hit association: reconcile replay presses against level targets.
//!
//! Targets are walked in start-time order with a cursor into the frame
//! sequence that only moves forward past frames consumed by a hit.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::constants::window;
use crate::error::Result;
use crate::level::{BreakPeriod, Level};
use crate::replay::{KeyCounter, Keys, Mods, Replay, ReplayFrame, detect_presses};

/// A press attributed to a target. Both sides are indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitFrame {
    /// Index into the level's targets
    pub target: usize,
    /// Index into the replay's frames
    pub frame: usize,
    /// New presses on that frame
    pub key: Keys,
}

/// A press not attributed to any target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickFrame {
    pub frame: usize,
    pub key: Keys,
}

/// Outcome of [`associate`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Association {
    pub hits: Vec<HitFrame>,
    pub attempted_hits: Vec<HitFrame>,
    /// Target indices without a definitive hit
    pub misses: Vec<usize>,
    /// Misses without even an attempted hit
    pub effortless_misses: Vec<usize>,
    pub extra_hits: Vec<ClickFrame>,
    /// Effective window W used for this run (ms)
    pub hit_window: f64,
}

impl Association {
    /// Hit registered on `frame`, if any
    pub fn hit_on_frame(&self, frame: usize) -> Option<&HitFrame> {
        self.hits.iter().find(|h| h.frame == frame)
    }

    pub fn attempted_hit_on_frame(&self, frame: usize) -> Option<&HitFrame> {
        self.attempted_hits.iter().find(|h| h.frame == frame)
    }

    pub fn is_hit(&self, target: usize) -> bool {
        self.hits.iter().any(|h| h.target == target)
    }
}

/// `W = -12 * OD + 259.5`
pub fn hit_window(overall_difficulty: f64) -> f64 {
    window::OD_SLOPE * overall_difficulty + window::OD_INTERCEPT
}

/// W after applying the time multiplier of the mods, when enabled
pub fn effective_hit_window(overall_difficulty: f64, mods: Mods, config: &AnalysisConfig) -> f64 {
    let base = hit_window(overall_difficulty);
    if config.scale_window_by_mods {
        base * mods.time_multiplier()
    } else {
        base
    }
}

/// Running press counter over the frames, outside break periods.
///
/// Presses count from `W` before the first target, except within
/// `[break.start - W, break.end]`.
struct PressTally<'a> {
    breaks: &'a [BreakPeriod],
    counting_starts: f64,
    hit_window: f64,
    break_index: usize,
    counted_until: usize,
    counter: KeyCounter,
}

impl<'a> PressTally<'a> {
    fn new(level: &'a Level, hit_window: f64) -> Self {
        Self {
            breaks: level.breaks(),
            counting_starts: level
                .targets()
                .first()
                .map_or(f64::INFINITY, |t| t.start_time - hit_window),
            hit_window,
            break_index: 0,
            counted_until: 0,
            counter: KeyCounter::new(),
        }
    }

    /// Feed every frame before `end` not yet counted, snapshotting the
    /// running total onto each.
    fn count_until(&mut self, frames: &mut [ReplayFrame], end: usize) {
        for j in self.counted_until..end {
            let previous = if j > 0 { frames[j - 1].keys } else { Keys::NONE };
            let time = f64::from(frames[j].time);

            while self.break_index < self.breaks.len()
                && time > self.breaks[self.break_index].end_time
            {
                self.break_index += 1;
            }
            let eligible = time >= self.counting_starts
                && self
                    .breaks
                    .get(self.break_index)
                    .is_none_or(|b| time < b.start_time - self.hit_window);
            if eligible {
                self.counter.update(previous, frames[j].keys);
            }
            frames[j].key_counter = self.counter;
        }
        self.counted_until = self.counted_until.max(end);
    }
}

/// Classify every non-spinner target as hit / attempted / missed and every
/// stray press as an extra hit.
///
/// With HardRock the level and replay are flipped once, before the first
/// association; later calls see them already flipped and leave them alone.
/// Combo and key counter snapshots are written back onto the frames.
pub fn associate(
    level: &mut Level,
    replay: &mut Replay,
    config: &AnalysisConfig,
) -> Result<Association> {
    replay.ensure_fully_loaded()?;

    if replay.mods().flips_playfield() {
        if !replay.is_axis_flipped() {
            info!("HardRock replay, flipping frames");
            replay.flip_vertical();
        }
        if !level.is_flipped() {
            level.flip_vertical();
        }
    }

    let level: &Level = level;
    let hit_window = effective_hit_window(level.overall_difficulty, replay.mods(), config);
    let attempt_window = window::ATTEMPT_MULTIPLIER * hit_window;
    let mut tally = PressTally::new(level, hit_window);
    let frames = replay.frames_mut();

    let mut result = Association {
        hit_window,
        ..Default::default()
    };
    let mut key_index = 0;
    let mut combo = 0;

    for (target_index, target) in level.targets().iter().enumerate() {
        if target.is_spinner() {
            continue;
        }

        let mut hit = false;
        let mut attempted = false;

        for j in key_index..frames.len() {
            let previous = if j > 0 { frames[j - 1].keys } else { Keys::NONE };
            let current = frames[j].keys;
            let time = f64::from(frames[j].time);
            let pressed = detect_presses(previous, current);

            // Each frame feeds the press counter once, even when rescanned
            tally.count_until(frames, j + 1);

            let error = time - target.start_time;
            if error > hit_window {
                break;
            }

            let position = frames[j].position();
            if !pressed.is_empty() {
                let applicable = if error > 0.0 {
                    target
                        .repeat_duration()
                        .map_or(hit_window, |d| hit_window.min(d))
                } else {
                    hit_window
                };

                if error.abs() <= applicable {
                    if target.contains_point(position) {
                        attempted = true;
                        hit = true;
                        combo += 1;
                        frames[j].combo = combo;
                        result.hits.push(HitFrame {
                            target: target_index,
                            frame: j,
                            key: pressed,
                        });
                        key_index = j + 1;
                        break;
                    }

                    if target.distance_to_center(position) > window::EXTRA_HIT_DISTANCE {
                        result.extra_hits.push(ClickFrame {
                            frame: j,
                            key: pressed,
                        });
                    } else {
                        attempted = true;
                        result.attempted_hits.push(HitFrame {
                            target: target_index,
                            frame: j,
                            key: pressed,
                        });
                    }
                }

                if error.abs() <= attempt_window && target.contains_point(position) {
                    attempted = true;
                    result.attempted_hits.push(HitFrame {
                        target: target_index,
                        frame: j,
                        key: pressed,
                    });
                }
            }

            frames[j].combo = combo;
        }

        if !hit {
            result.misses.push(target_index);
        }
        if !attempted {
            result.effortless_misses.push(target_index);
        }
    }

    // Frames past the last scanned one still carry the running total
    let frame_count = frames.len();
    tally.count_until(frames, frame_count);

    debug!(
        "Associated {} hits, {} attempted, {} misses ({} effortless), {} extra presses, W = {}ms",
        result.hits.len(),
        result.attempted_hits.len(),
        result.misses.len(),
        result.effortless_misses.len(),
        result.extra_hits.len(),
        hit_window
    );

    Ok(result)
}
