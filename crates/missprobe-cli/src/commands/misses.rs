//! Misses command: surroundings of every missed target.

use std::path::Path;

use anyhow::Result;
use missprobe_core::{AnalysisConfig, HitJudgement, MissContext, ReplayAnalyzer};

use super::load_pair;

/// Run the misses command
pub fn run(replay_path: &Path, level_path: &Path, json: bool, config: AnalysisConfig) -> Result<()> {
    let (mut replay, mut level) = load_pair(replay_path, level_path)?;
    let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, config)?;
    let contexts = analyzer.miss_contexts();

    if json {
        println!("{}", serde_json::to_string_pretty(&contexts)?);
        return Ok(());
    }

    if contexts.is_empty() {
        println!("No misses");
        return Ok(());
    }

    for (i, context) in contexts.iter().enumerate() {
        println!("{}", summarize(i + 1, context));
    }

    Ok(())
}

fn summarize(number: usize, context: &MissContext) -> String {
    let mut lines = vec![format!(
        "Miss #{} at {}ms {} ({} targets, {} frames nearby)",
        number,
        context.start_time,
        context.position,
        context.targets.len(),
        context.frames.len()
    )];
    lines.extend(
        context
            .frames
            .iter()
            .filter(|f| f.is_press)
            .map(|f| {
                let timing = match f.judgement {
                    HitJudgement::Miss => "out of window".to_string(),
                    judgement => format!("{} timing", judgement),
                };
                format!("  press {}ms {} {} ({})", f.time, f.position, f.keys, timing)
            }),
    );
    lines.join("\n")
}
