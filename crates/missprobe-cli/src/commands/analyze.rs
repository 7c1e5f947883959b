//! Analyze command: association plus the anomaly report.

use std::path::Path;

use anyhow::Result;
use missprobe_core::{AnalysisConfig, ReplayAnalyzer};
use owo_colors::OwoColorize;
use tracing::info;

use super::load_pair;

/// Run the analyze command
pub fn run(replay_path: &Path, level_path: &Path, json: bool, config: AnalysisConfig) -> Result<()> {
    let (mut replay, mut level) = load_pair(replay_path, level_path)?;
    info!("Analyzing {}", replay);

    let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, config)?;
    let report = analyzer.report();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for line in report.to_string().lines() {
        if line.starts_with("WARNING!") {
            println!("{}", line.red().bold());
        } else if line.starts_with("- [") || line == "GENERIC INFO" {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }

    if report.has_warnings() {
        eprintln!(
            "{}",
            format!("{} warning(s) raised", report.warnings.len()).yellow()
        );
    }

    Ok(())
}
