//! Aggregate analysis report and its text rendering.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::replay::Keys;

use super::judgement::JudgementCounts;

/// A suspicious signal. Never fatal, only reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    InconsistentMisses { detected: usize, recorded: u16 },
    LowUnstableRate { unstable_rate: f64, threshold: f64 },
    Timewarp { aim_frame_time: f64 },
    FastKeyPresses { median_interval: f64 },
    ConsistentAim { worst: f64, median: f64, variance: f64 },
    FrequentEdgeHits { count: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentMisses { detected, recorded } => write!(
                f,
                "Detected misses are not consistent with the replay: {detected} vs. {recorded} \
                 (missed spinner, unusual input or misclassification)"
            ),
            Self::LowUnstableRate {
                unstable_rate,
                threshold,
            } => write!(
                f,
                "Unstable rate {unstable_rate:.2} is below {threshold:.2} (automated timing)"
            ),
            Self::Timewarp { aim_frame_time } => write!(
                f,
                "Aim-only frame time {aim_frame_time:.2}ms does not match the speed mods (timewarp)"
            ),
            Self::FastKeyPresses { median_interval } => write!(
                f,
                "Median key press interval {median_interval:.2}ms is inhumanly low (timewarp/relax)"
            ),
            Self::ConsistentAim { .. } => {
                f.write_str("Notes are aimed too consistently (aim assistance)")
            }
            Self::FrequentEdgeHits { count } => write!(
                f,
                "{count} hits landed on the very edge of their targets (relax)"
            ),
        }
    }
}

/// A hit or attempted hit with its derived values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitSummary {
    pub target: usize,
    pub target_kind: String,
    pub start_time: f64,
    pub position: Point,
    pub frame: usize,
    pub time: i32,
    /// Press time minus target start (ms)
    pub error: f64,
    pub perfectness: f64,
    pub key: Keys,
}

impl fmt::Display for HitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}ms {}{} HIT at {}ms ({}ms error, {:.4} perfectness)",
            self.target_kind,
            self.start_time,
            self.position,
            if self.perfectness < 0.0 { " ATTEMPTED" } else { "" },
            self.time,
            self.error,
            self.perfectness
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleportSummary {
    pub frame: usize,
    pub time: i32,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickSummary {
    pub frame: usize,
    pub time: i32,
    pub key: Keys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissSummary {
    pub target: usize,
    pub target_kind: String,
    pub start_time: f64,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingletapSummary {
    pub first: HitSummary,
    pub second: HitSummary,
    /// Frame time gap scaled back to real time (ms)
    pub real_gap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyPressSummary {
    pub median: f64,
    pub min: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerfectnessSummary {
    pub best: f64,
    pub worst: f64,
    pub median: f64,
    pub variance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorSummary {
    pub acceleration_mean: Option<f64>,
    pub acceleration_variance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub player: Option<String>,
    pub mods: String,
    pub play_time: DateTime<Utc>,
    pub scored_targets: usize,
    pub hit_count: usize,
    pub attempted_hit_count: usize,
    pub miss_count: usize,
    pub recorded_miss_count: u16,
    pub hit_window: f64,
    pub unstable_rate: Option<f64>,
    pub unstable_rate_threshold: f64,
    pub best_cs_value: Option<f64>,
    pub average_frame_time: Option<f64>,
    pub median_frame_time: Option<f64>,
    pub aim_frame_time: Option<f64>,
    /// Key press intervals, already scaled back to real time
    pub key_presses: Option<KeyPressSummary>,
    pub perfectness: Option<PerfectnessSummary>,
    pub judgements: JudgementCounts,
    pub passed: bool,
    pub edge_hits: Vec<HitSummary>,
    pub over_aims: Vec<HitSummary>,
    pub teleports: Vec<TeleportSummary>,
    pub extra_hits: Vec<ClickSummary>,
    pub effortless_misses: Vec<MissSummary>,
    pub singletaps: Vec<SingletapSummary>,
    pub cursor: CursorSummary,
    pub warnings: Vec<Warning>,
}

fn optional(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}{unit}"))
}

impl Report {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    fn warnings_matching(&self, matches: fn(&Warning) -> bool) -> Vec<String> {
        self.warnings
            .iter()
            .filter(|w| matches(w))
            .map(|w| format!("WARNING! {w}"))
            .collect()
    }

    pub fn main_info(&self) -> String {
        let mut lines = vec!["GENERIC INFO".to_string()];
        lines.push(format!(
            "Misses: {} (replay reports {})",
            self.miss_count, self.recorded_miss_count
        ));
        lines.push(format!("Hits: {}/{}", self.hit_count, self.scored_targets));
        lines.push(format!(
            "Judgements: {} / {} / {} / {}",
            self.judgements.great, self.judgements.good, self.judgements.meh, self.judgements.miss
        ));
        lines.push(format!(
            "Unstable rate: {} (threshold {:.2})",
            optional(self.unstable_rate, ""),
            self.unstable_rate_threshold
        ));
        lines.push(format!("The best CS value: {}", optional(self.best_cs_value, "")));
        lines.push(format!(
            "Average frame time difference: {}",
            optional(self.average_frame_time, "ms")
        ));
        lines.push(format!(
            "Median frame time difference: {}",
            optional(self.median_frame_time, "ms")
        ));
        lines.push(format!(
            "Average frame time difference (aim only): {}",
            optional(self.aim_frame_time, "ms")
        ));
        match self.key_presses {
            Some(presses) => {
                lines.push(format!("Median key press time interval: {:.2}ms", presses.median));
                lines.push(format!("Min key press time interval: {:.2}ms", presses.min));
            }
            None => lines.push("Key press time interval: n/a".to_string()),
        }
        lines.push(format!("Extra hits: {}", self.extra_hits.len()));
        lines.push(format!("Pass: {}", self.passed));
        lines.extend(self.warnings_matching(|w| {
            !matches!(
                w,
                Warning::ConsistentAim { .. } | Warning::FrequentEdgeHits { .. }
            )
        }));
        lines.join("\n")
    }

    pub fn pixel_perfect_info(&self) -> String {
        let mut lines = vec!["- [PIXEL PERFECTS]:".to_string()];
        match self.perfectness {
            Some(p) => {
                lines.push(format!("The best pixel perfect hit: {:.4}", p.best));
                lines.push(format!("The worst pixel perfect hit: {:.4}", p.worst));
                lines.push(format!("Median pixel perfect hit: {:.4}", p.median));
                lines.push(format!("Perfectness variance: {:.4}", p.variance));
            }
            None => lines.push("No hits".to_string()),
        }
        lines.extend(self.warnings_matching(|w| matches!(w, Warning::ConsistentAim { .. })));
        lines.push(format!("Edge hits: {}", self.edge_hits.len()));
        lines.extend(self.edge_hits.iter().map(|h| format!("* {h}")));
        lines.extend(self.warnings_matching(|w| matches!(w, Warning::FrequentEdgeHits { .. })));
        lines.join("\n")
    }

    pub fn over_aim_info(&self) -> String {
        let mut lines = vec![
            "- [OVER-AIM]:".to_string(),
            format!("Over-aim count: {}", self.over_aims.len()),
        ];
        lines.extend(self.over_aims.iter().map(|h| format!("* {h}")));
        lines.join("\n")
    }

    pub fn teleport_info(&self) -> String {
        let mut lines = vec![
            "- [CURSOR TELEPORTS]:".to_string(),
            format!("Teleport count: {}", self.teleports.len()),
        ];
        lines.extend(
            self.teleports
                .iter()
                .map(|t| format!("* {}ms {:.2}px", t.time, t.distance)),
        );
        lines.join("\n")
    }

    pub fn extra_hit_info(&self) -> String {
        let mut lines = vec![
            "- [EXTRA HITS]".to_string(),
            format!("Extra hits count: {}", self.extra_hits.len()),
        ];
        lines.extend(
            self.extra_hits
                .iter()
                .map(|c| format!("* {}ms ({})", c.time, c.key)),
        );
        lines.join("\n")
    }

    pub fn effortless_miss_info(&self) -> String {
        let mut lines = vec![
            "- [EFFORTLESS MISSES]".to_string(),
            format!("Effortless misses count: {}", self.effortless_misses.len()),
        ];
        lines.extend(self.effortless_misses.iter().map(|m| {
            format!(
                "{} at {}ms {} missed without a corresponding hit",
                m.target_kind, m.start_time, m.position
            )
        }));
        lines.join("\n")
    }

    pub fn singletap_info(&self) -> String {
        let mut lines = vec![
            "- [SINGLETAPS]".to_string(),
            format!("Fast singletaps count: {}", self.singletaps.len()),
        ];
        lines.extend(self.singletaps.iter().map(|s| {
            format!(
                "* Object at {}ms {} singletapped with next at {}ms ({:.2}ms real frame time diff) - {}ms and {}ms error",
                s.first.start_time,
                s.first.key,
                s.second.start_time,
                s.real_gap,
                s.first.error,
                s.second.error
            )
        }));
        lines.join("\n")
    }

    pub fn cursor_info(&self) -> String {
        [
            "- [CURSOR MOVEMENT]".to_string(),
            format!(
                "Cursor acceleration mean: {}",
                optional(self.cursor.acceleration_mean, "")
            ),
            format!(
                "Cursor acceleration variance: {}",
                optional(self.cursor.acceleration_variance, "")
            ),
        ]
        .join("\n")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} +{} on {}",
            self.player.as_deref().unwrap_or("<unknown>"),
            self.mods,
            self.play_time.format("%Y-%m-%d %H:%M:%S")
        )?;
        let sections = [
            self.main_info(),
            self.pixel_perfect_info(),
            self.over_aim_info(),
            self.teleport_info(),
            self.extra_hit_info(),
            self.effortless_miss_info(),
            self.singletap_info(),
            self.cursor_info(),
        ];
        write!(f, "{}", sections.join("\n\n"))
    }
}
