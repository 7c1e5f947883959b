//! Annotated frame listing.

use std::fmt;

use crate::analysis::ReplayAnalyzer;
use crate::replay::Replay;

/// One line per frame; with an analyzer, frames carrying a hit or an
/// attempted hit get it appended.
pub struct Timeline<'a> {
    replay: &'a Replay,
    analyzer: Option<&'a ReplayAnalyzer<'a>>,
}

impl<'a> Timeline<'a> {
    pub fn plain(replay: &'a Replay) -> Self {
        Self {
            replay,
            analyzer: None,
        }
    }

    pub fn annotated(analyzer: &'a ReplayAnalyzer<'a>) -> Self {
        Self {
            replay: analyzer.replay(),
            analyzer: Some(analyzer),
        }
    }

    fn annotation(&self, index: usize) -> Option<String> {
        let analyzer = self.analyzer?;
        let association = analyzer.association();
        if let Some(hit) = association.hit_on_frame(index) {
            return Some(analyzer.hit_summary(hit).to_string());
        }
        association.attempted_hit_on_frame(index).map(|attempt| {
            let target = &analyzer.level().targets()[attempt.target];
            format!("{target} ATTEMPTED")
        })
    }
}

impl fmt::Display for Timeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.replay.frames().iter().enumerate() {
            write!(f, "{i}: {frame}")?;
            if let Some(annotation) = self.annotation(i) {
                write!(f, " {annotation}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::testing::four_target_scenario;

    #[test]
    fn test_plain_listing_has_one_line_per_frame() {
        let (_, replay) = four_target_scenario();
        let text = Timeline::plain(&replay).to_string();
        assert_eq!(text.lines().count(), replay.frames().len());
        assert!(text.starts_with("0: 900(900)"));
    }

    #[test]
    fn test_hits_are_annotated() {
        let (mut level, mut replay) = four_target_scenario();
        let analyzer =
            ReplayAnalyzer::new(&mut level, &mut replay, AnalysisConfig::default()).unwrap();
        let text = Timeline::annotated(&analyzer).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[1].starts_with("1: 1000(100)"));
        assert!(lines[1].contains("Circle at 1000ms"));
        assert!(!lines[2].contains("Circle"));
    }
}
