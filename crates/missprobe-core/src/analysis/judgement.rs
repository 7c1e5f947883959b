use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::constants::window;

/// Judgement a press would earn from its timing error alone
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr, Display,
)]
pub enum HitJudgement {
    #[strum(serialize = "300")]
    Great,
    #[strum(serialize = "100")]
    Good,
    #[strum(serialize = "50")]
    Meh,
    #[strum(serialize = "Miss")]
    Miss,
}

impl HitJudgement {
    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

/// Timing windows per judgement, `BASE - STEP * OD` (ms)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JudgementWindows {
    pub great: f64,
    pub good: f64,
    pub meh: f64,
}

impl JudgementWindows {
    pub fn from_od(overall_difficulty: f64) -> Self {
        Self {
            great: window::GREAT_BASE - window::GREAT_STEP * overall_difficulty,
            good: window::GOOD_BASE - window::GOOD_STEP * overall_difficulty,
            meh: window::MEH_BASE - window::MEH_STEP * overall_difficulty,
        }
    }

    /// Bounds are exclusive: an error equal to a window falls to the next tier
    pub fn judge(&self, error_ms: f64) -> HitJudgement {
        let error = error_ms.abs();
        if error < self.great {
            HitJudgement::Great
        } else if error < self.good {
            HitJudgement::Good
        } else if error < self.meh {
            HitJudgement::Meh
        } else {
            HitJudgement::Miss
        }
    }
}

/// Distribution of judgements over a set of hits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgementCounts {
    pub great: u32,
    pub good: u32,
    pub meh: u32,
    pub miss: u32,
}

impl JudgementCounts {
    pub fn add(&mut self, judgement: HitJudgement) {
        match judgement {
            HitJudgement::Great => self.great += 1,
            HitJudgement::Good => self.good += 1,
            HitJudgement::Meh => self.meh += 1,
            HitJudgement::Miss => self.miss += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.great + self.good + self.meh + self.miss
    }
}

impl FromIterator<HitJudgement> for JudgementCounts {
    fn from_iter<I: IntoIterator<Item = HitJudgement>>(iter: I) -> Self {
        let mut counts = Self::default();
        for judgement in iter {
            counts.add(judgement);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_from_od() {
        let windows = JudgementWindows::from_od(8.0);
        assert_eq!(windows.great, 31.5);
        assert_eq!(windows.good, 75.5);
        assert_eq!(windows.meh, 119.5);
    }

    #[test]
    fn test_judge_is_symmetric() {
        let windows = JudgementWindows::from_od(8.0);
        assert_eq!(windows.judge(-31.0), HitJudgement::Great);
        assert_eq!(windows.judge(31.5), HitJudgement::Good);
        assert_eq!(windows.judge(-40.0), HitJudgement::Good);
        assert_eq!(windows.judge(-100.0), HitJudgement::Meh);
        assert_eq!(windows.judge(119.5), HitJudgement::Miss);
    }

    #[test]
    fn test_counts_collect() {
        let counts: JudgementCounts = [HitJudgement::Great, HitJudgement::Great, HitJudgement::Meh]
            .into_iter()
            .collect();
        assert_eq!(counts.great, 2);
        assert_eq!(counts.meh, 1);
        assert_eq!(counts.total(), 3);
        assert_eq!(HitJudgement::Good.short_name(), "100");
    }
}
