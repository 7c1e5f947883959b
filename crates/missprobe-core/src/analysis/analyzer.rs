//! Anomaly statistics over an association and the replay's kinematics.
//!
//! Every method is a read. The only interior state is the perfectness
//! memo, which is behind a mutex so the analyzer can be shared across
//! threads.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::constants::{report, tapping, teleport};
use crate::error::{Error, Result};
use crate::level::{Level, Target};
use crate::replay::{Keys, Replay, ReplayFrame};

use super::association::{Association, HitFrame, associate};
use super::context::{MissContext, miss_context};
use super::judgement::{JudgementCounts, JudgementWindows};
use super::perfectness::{PerfectnessCache, perfectness};
use super::report::{
    ClickSummary, CursorSummary, HitSummary, KeyPressSummary, MissSummary, PerfectnessSummary,
    Report, SingletapSummary, TeleportSummary, Warning,
};
use super::stats;

pub struct ReplayAnalyzer<'a> {
    level: &'a Level,
    replay: &'a Replay,
    config: AnalysisConfig,
    association: Association,
    /// Real-time scale of the mods (1.5 with DoubleTime / Nightcore)
    multiplier: f64,
    perfectness: PerfectnessCache,
}

impl<'a> ReplayAnalyzer<'a> {
    /// Run hit association and wrap the result for analysis
    pub fn new(level: &'a mut Level, replay: &'a mut Replay, config: AnalysisConfig) -> Result<Self> {
        let association = associate(level, replay, &config)?;
        Ok(Self::from_association(level, replay, association, config))
    }

    /// Analyze an association computed earlier against the same level and replay
    pub fn from_association(
        level: &'a Level,
        replay: &'a Replay,
        association: Association,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            level,
            replay,
            config,
            association,
            multiplier: replay.mods().time_multiplier(),
            perfectness: PerfectnessCache::new(),
        }
    }

    pub fn association(&self) -> &Association {
        &self.association
    }

    pub fn level(&self) -> &Level {
        self.level
    }

    pub fn replay(&self) -> &Replay {
        self.replay
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    fn target(&self, hit: &HitFrame) -> &Target {
        &self.level.targets()[hit.target]
    }

    fn frame(&self, index: usize) -> &ReplayFrame {
        &self.replay.frames()[index]
    }

    /// Press time minus target start for every hit (ms)
    pub fn hit_errors(&self) -> Vec<f64> {
        self.association
            .hits
            .iter()
            .map(|hit| f64::from(self.frame(hit.frame).time) - self.target(hit).start_time)
            .collect()
    }

    /// 10 x variance of the hit errors
    pub fn unstable_rate(&self) -> Option<f64> {
        stats::variance(&self.hit_errors()).map(|v| 10.0 * v)
    }

    pub fn unstable_rate_threshold(&self) -> f64 {
        report::UNSTABLE_RATE_BASELINE * self.multiplier
    }

    /// Memoized perfectness of a hit or attempted hit
    pub fn perfectness(&self, hit: &HitFrame) -> f64 {
        self.perfectness.get_or_compute(hit.frame, hit.target, || {
            perfectness(self.target(hit), self.frame(hit.frame).position())
        })
    }

    pub fn perfectness_values(&self) -> Vec<f64> {
        self.association
            .hits
            .iter()
            .map(|hit| self.perfectness(hit))
            .collect()
    }

    /// Largest circle size that would still have registered every hit.
    ///
    /// The hit farthest from its center needs a radius of
    /// `(1 - perfectness) * r`, mapped back through `(54.42 - radius) / 4.48`.
    pub fn best_cs_value(&self) -> Option<f64> {
        let worst = stats::min(&self.perfectness_values())?;
        let radius = (1.0 - worst) * self.level.circle_radius();
        Some((report::CS_RADIUS_INTERCEPT - radius) / report::CS_RADIUS_SLOPE)
    }

    /// Hits whose perfectness is below `threshold`, in hit order
    pub fn edge_hits(&self, threshold: f64) -> Vec<HitFrame> {
        self.association
            .hits
            .iter()
            .filter(|hit| self.perfectness(hit) < threshold)
            .copied()
            .collect()
    }

    /// Edge hits closest to the rim first, at most `max_size` of them
    pub fn sorted_edge_hits(&self, max_size: usize, threshold: f64) -> Vec<HitFrame> {
        let mut hits = self.edge_hits(threshold);
        hits.sort_by(|a, b| self.perfectness(a).total_cmp(&self.perfectness(b)));
        hits.truncate(max_size);
        hits
    }

    /// Adjacent circle hits too close together for the same key
    pub fn singletaps(&self) -> Vec<(HitFrame, HitFrame)> {
        let limit = tapping::SINGLETAP_LIMIT_MS * self.multiplier;
        let circle_hits: Vec<&HitFrame> = self
            .association
            .hits
            .iter()
            .filter(|hit| self.target(hit).is_circle())
            .collect();

        circle_hits
            .windows(2)
            .filter(|pair| {
                let (first, second) = (pair[0], pair[1]);
                let frame_gap = f64::from(self.frame(second.frame).time - self.frame(first.frame).time);
                let start_gap = self.target(second).start_time - self.target(first).start_time;
                (frame_gap <= limit || start_gap <= limit) && first.key.intersects(second.key)
            })
            .map(|pair| (*pair[0], *pair[1]))
            .collect()
    }

    pub fn is_teleport(frame: &ReplayFrame) -> bool {
        let distance = frame.travelled_distance_delta;
        (distance >= teleport::INFINITE_SPEED_DISTANCE && frame.speed.is_infinite())
            || (distance >= teleport::MIN_DISTANCE && frame.speed >= teleport::MIN_SPEED)
    }

    /// Frame indices of implausible cursor jumps outside spinners
    pub fn cursor_teleports(&self) -> Vec<usize> {
        let frames = self.replay.frames();
        let spinners: Vec<&Target> = self.level.spinners().collect();
        let mut spinner_index = 0;
        let mut result = Vec::new();

        for &i in self
            .replay
            .kinematic_indices()
            .iter()
            .skip(teleport::WARMUP_SAMPLES)
        {
            let frame = &frames[i];
            let time = f64::from(frame.time);
            while spinner_index < spinners.len() && time > spinners[spinner_index].end_time() {
                spinner_index += 1;
            }
            let outside_spinner = spinners
                .get(spinner_index)
                .is_none_or(|s| time < s.start_time);

            if outside_spinner && Self::is_teleport(frame) {
                result.push(i);
            }
        }

        result
    }

    /// Hits where the cursor entered the target, left it, and came back
    pub fn over_aims(&self) -> Vec<HitFrame> {
        let frames = self.replay.frames();
        let window = self.association.hit_window;

        self.association
            .hits
            .iter()
            .filter(|hit| {
                let target = self.target(hit);
                let hit_time = frames[hit.frame].time;
                let inside = |j: usize| target.contains_point(frames[j].position());

                let opens = frames.partition_point(|f| f64::from(f.time) < target.start_time - window);
                let Some(entry) = (opens..frames.len())
                    .take_while(|&j| f64::from(frames[j].time) <= target.start_time + window)
                    .find(|&j| inside(j))
                else {
                    return false;
                };

                let mut j = entry;
                while j < frames.len() && inside(j) && frames[j].time < hit_time {
                    j += 1;
                }
                j < frames.len() && !inside(j)
            })
            .copied()
            .collect()
    }

    /// Hold durations of K1 / K2, one per press-release cycle that started
    /// on a circle hit (ms, game time)
    pub fn key_press_intervals(&self) -> Vec<f64> {
        let circle_hit_frames: HashSet<usize> = self
            .association
            .hits
            .iter()
            .filter(|hit| self.target(hit).is_circle())
            .map(|hit| hit.frame)
            .collect();

        let mut result = Vec::new();
        let mut held = [false; 2];
        let mut timers = [0.0f64; 2];

        for (i, frame) in self.replay.frames().iter().enumerate() {
            for (slot, key) in [Keys::K1, Keys::K2].into_iter().enumerate() {
                let down = frame.keys.contains(key);
                if circle_hit_frames.contains(&i) && !held[slot] && down {
                    held[slot] = true;
                }
                if held[slot] && down {
                    timers[slot] += f64::from(frame.time_delta);
                }
                if held[slot] && !down {
                    held[slot] = false;
                    result.push(timers[slot]);
                    timers[slot] = 0.0;
                }
            }
        }

        result
    }

    fn kinematic_deltas(&self) -> Vec<f64> {
        self.replay
            .kinematic_frames()
            .map(|f| f64::from(f.time_delta))
            .collect()
    }

    /// Mean delta over frames faster than 30ms
    pub fn average_frame_time(&self) -> Option<f64> {
        let deltas: Vec<f64> = self
            .replay
            .kinematic_frames()
            .filter(|f| f.time_delta < report::FRAME_TIME_MAX_MS)
            .map(|f| f64::from(f.time_delta))
            .collect();
        stats::mean(&deltas)
    }

    pub fn median_frame_time(&self) -> Option<f64> {
        stats::median(&self.kinematic_deltas())
    }

    /// Mean delta of frames whose neighbours on both sides hold no key
    pub fn aim_frame_time(&self) -> Option<f64> {
        let frames: Vec<&ReplayFrame> = self.replay.kinematic_frames().collect();
        let deltas: Vec<f64> = frames
            .windows(3)
            .filter(|w| w.iter().all(|f| !f.keys.any_held()))
            .map(|w| f64::from(w[1].time_delta))
            .collect();
        stats::mean(&deltas)
    }

    fn accelerations(&self) -> Vec<f64> {
        self.replay
            .kinematic_frames()
            .map(|f| f.acceleration)
            .collect()
    }

    pub fn acceleration_mean(&self) -> Option<f64> {
        stats::mean(&self.accelerations())
    }

    pub fn acceleration_variance(&self) -> Option<f64> {
        stats::variance(&self.accelerations())
    }

    /// Compare detected misses with the replay's own miss counter
    pub fn check_miss_consistency(&self) -> Result<()> {
        let detected = self.association.misses.len();
        let recorded = self.replay.header.count_miss;
        if detected == usize::from(recorded) {
            Ok(())
        } else {
            Err(Error::InconsistentReplay { detected, recorded })
        }
    }

    pub fn judgement_counts(&self) -> JudgementCounts {
        let windows = JudgementWindows::from_od(self.level.overall_difficulty);
        self.hit_errors()
            .into_iter()
            .map(|error| windows.judge(error))
            .collect()
    }

    pub fn miss_contexts(&self) -> Vec<MissContext> {
        self.association
            .misses
            .iter()
            .filter_map(|&target| {
                miss_context(
                    self.level,
                    self.replay,
                    target,
                    self.config.miss_context_span_ms,
                )
            })
            .collect()
    }

    pub fn hit_summary(&self, hit: &HitFrame) -> HitSummary {
        let target = self.target(hit);
        let frame = self.frame(hit.frame);
        HitSummary {
            target: hit.target,
            target_kind: target.kind.name().to_string(),
            start_time: target.start_time,
            position: target.position,
            frame: hit.frame,
            time: frame.time,
            error: f64::from(frame.time) - target.start_time,
            perfectness: self.perfectness(hit),
            key: hit.key,
        }
    }

    fn perfectness_summary(&self) -> Option<PerfectnessSummary> {
        let values = self.perfectness_values();
        Some(PerfectnessSummary {
            best: stats::max(&values)?,
            worst: stats::min(&values)?,
            median: stats::median(&values)?,
            variance: stats::variance(&values)?,
        })
    }

    fn key_press_summary(&self) -> Option<KeyPressSummary> {
        let intervals = self.key_press_intervals();
        Some(KeyPressSummary {
            median: stats::median(&intervals)? / self.multiplier,
            min: stats::min(&intervals)? / self.multiplier,
        })
    }

    /// Build the full report. Statistical anomalies become warnings.
    pub fn report(&self) -> Report {
        let mods = self.replay.mods();
        let unstable_rate = self.unstable_rate();
        let aim_frame_time = self.aim_frame_time();
        let key_presses = self.key_press_summary();
        let perfectness = self.perfectness_summary();
        let edge_hits = self.sorted_edge_hits(
            self.config.max_listed_pixel_perfects,
            self.config.pixel_perfect_threshold,
        );

        let mut warnings = Vec::new();

        if let Err(Error::InconsistentReplay { detected, recorded }) = self.check_miss_consistency()
        {
            warn!(
                "Detected {} misses but the replay records {}",
                detected, recorded
            );
            warnings.push(Warning::InconsistentMisses { detected, recorded });
        }

        let threshold = self.unstable_rate_threshold();
        if let Some(ur) = unstable_rate.filter(|&ur| ur < threshold) {
            warnings.push(Warning::LowUnstableRate {
                unstable_rate: ur,
                threshold,
            });
        }

        if let Some(frame_time) = aim_frame_time {
            let sped_up = mods.is_sped_up() && frame_time < report::AIM_FRAME_TIME_SPED_UP_MS;
            let normal = !mods.is_slowed_down() && frame_time < report::AIM_FRAME_TIME_NORMAL_MS;
            if sped_up || normal {
                warnings.push(Warning::Timewarp {
                    aim_frame_time: frame_time,
                });
            }
        }

        if let Some(presses) = key_presses.filter(|p| p.median < tapping::MIN_HUMAN_PRESS_MS) {
            warnings.push(Warning::FastKeyPresses {
                median_interval: presses.median,
            });
        }

        if let Some(p) = perfectness {
            if p.worst > report::CONSISTENT_AIM_WORST_PERFECTNESS
                || p.variance < report::CONSISTENT_AIM_VARIANCE
                || p.median > report::CONSISTENT_AIM_MEDIAN_PERFECTNESS
            {
                warnings.push(Warning::ConsistentAim {
                    worst: p.worst,
                    median: p.median,
                    variance: p.variance,
                });
            }
        }

        let unrealistic = self
            .edge_hits(report::UNREALISTIC_EDGE_PERFECTNESS)
            .len();
        if unrealistic > self.config.relax_pixel_perfect_count {
            warnings.push(Warning::FrequentEdgeHits { count: unrealistic });
        }

        let singletaps = self
            .singletaps()
            .iter()
            .map(|(first, second)| SingletapSummary {
                first: self.hit_summary(first),
                second: self.hit_summary(second),
                real_gap: f64::from(self.frame(second.frame).time - self.frame(first.frame).time)
                    / self.multiplier,
            })
            .collect();

        let report = Report {
            player: self.replay.header.player_name.clone(),
            mods: mods.to_string(),
            play_time: self.replay.play_time,
            scored_targets: self.level.scored_target_count(),
            hit_count: self.association.hits.len(),
            attempted_hit_count: self.association.attempted_hits.len(),
            miss_count: self.association.misses.len(),
            recorded_miss_count: self.replay.header.count_miss,
            hit_window: self.association.hit_window,
            unstable_rate,
            unstable_rate_threshold: threshold,
            best_cs_value: self.best_cs_value(),
            average_frame_time: self.average_frame_time(),
            median_frame_time: self.median_frame_time(),
            aim_frame_time,
            key_presses,
            perfectness,
            judgements: self.judgement_counts(),
            passed: self.replay.is_pass(),
            edge_hits: edge_hits.iter().map(|h| self.hit_summary(h)).collect(),
            over_aims: self
                .over_aims()
                .iter()
                .map(|h| self.hit_summary(h))
                .collect(),
            teleports: self
                .cursor_teleports()
                .into_iter()
                .map(|i| TeleportSummary {
                    frame: i,
                    time: self.frame(i).time,
                    distance: self.frame(i).travelled_distance_delta,
                })
                .collect(),
            extra_hits: self
                .association
                .extra_hits
                .iter()
                .map(|c| ClickSummary {
                    frame: c.frame,
                    time: self.frame(c.frame).time,
                    key: c.key,
                })
                .collect(),
            effortless_misses: self
                .association
                .effortless_misses
                .iter()
                .map(|&t| {
                    let target = &self.level.targets()[t];
                    MissSummary {
                        target: t,
                        target_kind: target.kind.name().to_string(),
                        start_time: target.start_time,
                        position: target.position,
                    }
                })
                .collect(),
            singletaps,
            cursor: CursorSummary {
                acceleration_mean: self.acceleration_mean(),
                acceleration_variance: self.acceleration_variance(),
            },
            warnings,
        };

        debug!(
            "Report built with {} warnings over {} hits",
            report.warnings.len(),
            report.hit_count
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::replay::{Mods, ReplayHeader};
    use crate::testing::{circles, four_target_scenario, replay_from};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn frame_with(distance_delta: f64, speed: f64) -> ReplayFrame {
        ReplayFrame {
            travelled_distance_delta: distance_delta,
            speed,
            ..Default::default()
        }
    }

    #[test]
    fn test_teleport_thresholds() {
        assert!(ReplayAnalyzer::is_teleport(&frame_with(200.0, 10.0)));
        assert!(!ReplayAnalyzer::is_teleport(&frame_with(30.0, 3.0)));
        assert!(ReplayAnalyzer::is_teleport(&frame_with(40.0, f64::INFINITY)));
        assert!(!ReplayAnalyzer::is_teleport(&frame_with(39.0, f64::INFINITY)));
        assert!(!ReplayAnalyzer::is_teleport(&frame_with(149.0, 100.0)));
    }

    #[test]
    fn test_unstable_rate_is_ten_times_variance() {
        let (mut level, mut replay) = four_target_scenario();
        let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();

        // Errors 0, 10, 5
        assert_eq!(analyzer.hit_errors(), vec![0.0, 10.0, 5.0]);
        assert_close(analyzer.unstable_rate().unwrap(), 10.0 * 50.0 / 3.0);
        assert_eq!(analyzer.unstable_rate_threshold(), 47.5);
    }

    #[test]
    fn test_perfectness_and_best_cs() {
        let (mut level, mut replay) = four_target_scenario();
        let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();
        let radius = analyzer.level().circle_radius();

        let values = analyzer.perfectness_values();
        assert_close(values[0], 1.0);
        assert_close(values[1], 1.0 - 5.0 / radius);
        assert_close(values[2], 1.0 - 1.0 / radius);

        // Farthest hit is 5px from center
        assert_close(analyzer.best_cs_value().unwrap(), (54.42 - 5.0) / 4.48);
    }

    #[test]
    fn test_miss_consistency() {
        let (mut level, mut replay) = four_target_scenario();
        replay.header.count_miss = 1;
        {
            let analyzer =
                ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();
            assert!(analyzer.check_miss_consistency().is_ok());
        }

        replay.header.count_miss = 0;
        let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();
        let err = analyzer.check_miss_consistency().unwrap_err();
        assert!(matches!(
            err,
            Error::InconsistentReplay {
                detected: 1,
                recorded: 0
            }
        ));

        let report = analyzer.report();
        assert!(report.warnings.contains(&Warning::InconsistentMisses {
            detected: 1,
            recorded: 0
        }));
    }

    #[test]
    fn test_singletaps_need_shared_key_and_short_gap() {
        let mut level = circles(&[
            (1000.0, 100.0, 100.0),
            (1080.0, 150.0, 100.0),
            (1160.0, 200.0, 100.0),
        ]);
        let mut replay = replay_from(
            &[
                (990, 100.0, 100.0, Keys::NONE),
                (1000, 100.0, 100.0, Keys::K1),
                (1040, 120.0, 100.0, Keys::NONE),
                (1080, 150.0, 100.0, Keys::K1),
                (1120, 170.0, 100.0, Keys::NONE),
                (1160, 200.0, 100.0, Keys::K2),
                (1200, 200.0, 100.0, Keys::NONE),
            ],
            Mods::NONE,
        );
        let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();

        let pairs: Vec<(usize, usize)> = analyzer
            .singletaps()
            .iter()
            .map(|(a, b)| (a.target, b.target))
            .collect();
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn test_cursor_teleports_skip_warmup_and_spinners() {
        let mut level = circles(&[(100.0, 0.0, 0.0)]);
        level.add_target(Target::spinner(300.0, 400.0));
        let mut replay = replay_from(
            &[
                (10, 0.0, 0.0, Keys::NONE),
                (20, 300.0, 0.0, Keys::NONE),
                (30, 300.0, 10.0, Keys::NONE),
                (40, 300.0, 20.0, Keys::NONE),
                (50, 0.0, 20.0, Keys::NONE),
                (340, 0.0, 20.0, Keys::NONE),
                (350, 300.0, 20.0, Keys::NONE),
                (360, 300.0, 30.0, Keys::NONE),
                (500, 300.0, 40.0, Keys::NONE),
                (510, 0.0, 40.0, Keys::NONE),
                (520, 0.0, 40.0, Keys::NONE),
            ],
            Mods::NONE,
        );
        let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();

        // Jumps at index 1 (warm-up) and 6 (spinner) are ignored
        assert_eq!(analyzer.cursor_teleports(), vec![4, 9]);
    }

    #[test]
    fn test_over_aim_detected_when_cursor_leaves_area() {
        let mut level = circles(&[(1000.0, 100.0, 100.0), (2000.0, 300.0, 100.0)]);
        let mut replay = replay_from(
            &[
                (900, 100.0, 100.0, Keys::NONE),
                (950, 160.0, 100.0, Keys::NONE),
                (1000, 100.0, 100.0, Keys::K1),
                (1050, 100.0, 100.0, Keys::NONE),
                (1900, 300.0, 100.0, Keys::NONE),
                (2000, 300.0, 100.0, Keys::K1),
                (2050, 300.0, 100.0, Keys::NONE),
            ],
            Mods::NONE,
        );
        let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();

        let over_aims: Vec<usize> = analyzer.over_aims().iter().map(|h| h.target).collect();
        assert_eq!(over_aims, vec![0]);
    }

    #[test]
    fn test_key_press_intervals() {
        let (mut level, mut replay) = four_target_scenario();
        let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();

        // K1 held on the 1000ms frame (delta 100), released at 1100;
        // K2 held on the 4005ms frame (delta 55), released at 4100
        assert_eq!(analyzer.key_press_intervals(), vec![100.0, 55.0]);
    }

    #[test]
    fn test_frame_time_averages() {
        let mut level = circles(&[(1000.0, 100.0, 100.0)]);
        let mut replay = replay_from(
            &[
                (16, 0.0, 0.0, Keys::NONE),
                (32, 1.0, 0.0, Keys::NONE),
                (48, 2.0, 0.0, Keys::NONE),
                (64, 3.0, 0.0, Keys::M1),
                (164, 4.0, 0.0, Keys::NONE),
            ],
            Mods::NONE,
        );
        let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();

        assert_eq!(analyzer.average_frame_time(), Some(16.0));
        assert_eq!(analyzer.median_frame_time(), Some(16.0));
        // Only the 32ms frame has idle neighbours on both sides
        assert_eq!(analyzer.aim_frame_time(), Some(16.0));
    }

    #[test]
    fn test_edge_hits_sorted_by_rim_distance() {
        let mut level = circles(&[(1000.0, 100.0, 100.0), (2000.0, 100.0, 100.0)]);
        let radius = level.circle_radius() as f32;
        let mut replay = replay_from(
            &[
                (900, 100.0, 100.0, Keys::NONE),
                (1000, 100.0 + radius * 0.99, 100.0, Keys::K1),
                (1100, 100.0, 100.0, Keys::NONE),
                (2000, 100.0 + radius * 0.999, 100.0, Keys::K1),
                (2100, 100.0, 100.0, Keys::NONE),
            ],
            Mods::NONE,
        );
        let config = AnalysisConfig::builder().pixel_perfect_threshold(0.02).build();
        let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, config).unwrap();

        let targets: Vec<usize> = analyzer
            .sorted_edge_hits(10, 0.02)
            .iter()
            .map(|h| h.target)
            .collect();
        assert_eq!(targets, vec![1, 0]);
        assert_eq!(analyzer.sorted_edge_hits(1, 0.02).len(), 1);
    }

    #[test]
    fn test_report_sections_and_json() {
        let (mut level, mut replay) = four_target_scenario();
        replay.header.count_miss = 1;
        let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();
        let report = analyzer.report();

        assert_eq!(report.hit_count, 3);
        assert_eq!(report.miss_count, 1);
        assert_eq!(report.effortless_misses.len(), 1);
        assert_eq!(report.effortless_misses[0].position, Point::new(400.0, 300.0));
        assert!(report.passed);
        // Worst hit is still 5px from center
        assert!(
            report
                .warnings
                .iter()
                .any(|w| matches!(w, Warning::ConsistentAim { .. }))
        );
        assert!(
            !report
                .warnings
                .iter()
                .any(|w| matches!(w, Warning::LowUnstableRate { .. }))
        );

        let text = report.to_string();
        assert!(text.starts_with("fixture +None on"));
        for heading in [
            "GENERIC INFO",
            "- [PIXEL PERFECTS]:",
            "- [OVER-AIM]:",
            "- [CURSOR TELEPORTS]:",
            "- [EXTRA HITS]",
            "- [EFFORTLESS MISSES]",
            "- [SINGLETAPS]",
            "- [CURSOR MOVEMENT]",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["miss_count"], 1);
    }

    #[test]
    fn test_header_only_replay_cannot_be_analyzed() {
        let mut level = circles(&[(1000.0, 0.0, 0.0)]);
        let mut replay = Replay::header_only(ReplayHeader::default());
        let result = ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default());
        assert!(result.is_err_and(|e| e.is_recoverable()));
    }
}
