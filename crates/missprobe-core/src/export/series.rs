//! Raw per-frame and per-hit series for external plotting.

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::analysis::ReplayAnalyzer;

/// Which series to export
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SeriesKind {
    /// Time, delta, position, keys, distance delta, speed and acceleration
    /// of every kinematic frame
    Kinematics,
    /// Delta of every kinematic frame
    FrameTimes,
    /// Press time minus target start per hit
    HitErrors,
    /// K1 / K2 hold durations
    PressIntervals,
    /// Perfectness per hit
    Perfectness,
}

/// Named columns of numeric rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub kind: SeriesKind,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<f64>>,
}

impl Series {
    pub fn collect(kind: SeriesKind, analyzer: &ReplayAnalyzer<'_>) -> Self {
        let replay = analyzer.replay();
        let frames = replay.frames();

        let (columns, rows): (Vec<&'static str>, Vec<Vec<f64>>) = match kind {
            SeriesKind::Kinematics => (
                vec![
                    "time",
                    "delta",
                    "x",
                    "y",
                    "keys",
                    "distance_delta",
                    "speed",
                    "acceleration",
                ],
                replay
                    .kinematic_frames()
                    .map(|f| {
                        vec![
                            f64::from(f.time),
                            f64::from(f.time_delta),
                            f64::from(f.x),
                            f64::from(f.y),
                            f64::from(f.keys.bits()),
                            f.travelled_distance_delta,
                            f.speed,
                            f.acceleration,
                        ]
                    })
                    .collect(),
            ),
            SeriesKind::FrameTimes => (
                vec!["time", "delta"],
                replay
                    .kinematic_frames()
                    .map(|f| vec![f64::from(f.time), f64::from(f.time_delta)])
                    .collect(),
            ),
            SeriesKind::HitErrors => (
                vec!["time", "error"],
                analyzer
                    .association()
                    .hits
                    .iter()
                    .zip(analyzer.hit_errors())
                    .map(|(hit, error)| vec![f64::from(frames[hit.frame].time), error])
                    .collect(),
            ),
            SeriesKind::PressIntervals => (
                vec!["interval"],
                analyzer
                    .key_press_intervals()
                    .into_iter()
                    .map(|interval| vec![interval])
                    .collect(),
            ),
            SeriesKind::Perfectness => (
                vec!["time", "perfectness"],
                analyzer
                    .association()
                    .hits
                    .iter()
                    .map(|hit| {
                        vec![
                            f64::from(frames[hit.frame].time),
                            analyzer.perfectness(hit),
                        ]
                    })
                    .collect(),
            ),
        };

        Self {
            kind,
            columns,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::testing::four_target_scenario;

    #[test]
    fn test_kind_names() {
        assert_eq!(SeriesKind::HitErrors.to_string(), "hit-errors");
        assert_eq!(
            "press-intervals".parse::<SeriesKind>().unwrap(),
            SeriesKind::PressIntervals
        );
        assert!("velocity".parse::<SeriesKind>().is_err());
    }

    #[test]
    fn test_rows_match_columns() {
        let (mut level, mut replay) = four_target_scenario();
        let analyzer =
            ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();

        for kind in <SeriesKind as strum::IntoEnumIterator>::iter() {
            let series = Series::collect(kind, &analyzer);
            assert!(
                series.rows.iter().all(|r| r.len() == series.columns.len()),
                "{kind}"
            );
        }

        let errors = Series::collect(SeriesKind::HitErrors, &analyzer);
        assert_eq!(
            errors.rows,
            vec![vec![1000.0, 0.0], vec![2010.0, 10.0], vec![4005.0, 5.0]]
        );
        assert_eq!(
            Series::collect(SeriesKind::Kinematics, &analyzer).rows.len(),
            11
        );
    }
}
