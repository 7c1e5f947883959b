//! Export command for raw analysis series.

use std::path::Path;

use anyhow::{Context, Result};
use missprobe_core::{
    AnalysisConfig, ExportFormat as _, JsonExporter, ReplayAnalyzer, Series, SeriesKind,
    TsvExporter,
};

use super::load_pair;
use crate::cli::ExportFormat;

/// Export one series of the analyzed replay
pub fn run(
    replay_path: &Path,
    level_path: &Path,
    kind: SeriesKind,
    format: ExportFormat,
    output: Option<&Path>,
    config: AnalysisConfig,
) -> Result<()> {
    let (mut replay, mut level) = load_pair(replay_path, level_path)?;
    let analyzer = ReplayAnalyzer::new(&mut level, &mut replay, config)?;
    let series = Series::collect(kind, &analyzer);

    let content = match format {
        ExportFormat::Tsv => TsvExporter.format_series(&series),
        ExportFormat::Json => JsonExporter.format_series(&series),
    };

    if let Some(output_path) = output {
        std::fs::write(output_path, &content)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        eprintln!(
            "Exported {} rows of {} to: {}",
            series.rows.len(),
            kind,
            output_path.display()
        );
    } else {
        print!("{}", content);
    }

    Ok(())
}
