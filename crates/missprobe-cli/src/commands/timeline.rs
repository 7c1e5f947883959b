//! Timeline command: one line per frame.

use std::path::Path;

use anyhow::Result;
use missprobe_core::{AnalysisConfig, ReplayAnalyzer, Timeline};

use super::{load_pair, load_replay};

/// Run the timeline command
pub fn run(replay_path: &Path, level_path: Option<&Path>, config: AnalysisConfig) -> Result<()> {
    let Some(level_path) = level_path else {
        let replay = load_replay(replay_path)?;
        print!("{}", Timeline::plain(&replay));
        return Ok(());
    };

    let (mut replay, mut level) = load_pair(replay_path, level_path)?;
    let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, config)?;
    print!("{}", Timeline::annotated(&analyzer));

    Ok(())
}
