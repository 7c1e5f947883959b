//! # missprobe-core
//!
//! Core library for the missprobe replay forensics tool.
//!
//! This crate provides:
//! - Binary replay codec (header, life bar, LZMA-compressed event stream)
//! - Cursor kinematics over the decoded frames
//! - Level object model with a JSON definition format
//! - Hit association of presses against targets
//! - Anomaly statistics, miss contexts and report text
//! - Raw series exports (TSV / NDJSON) and an annotated frame timeline

pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod geometry;
pub mod kinematics;
pub mod level;
pub mod replay;

#[cfg(test)]
pub(crate) mod testing;

pub use analysis::{
    Association, ClickFrame, HitFrame, HitJudgement, JudgementCounts, JudgementWindows,
    MissContext, Report, ReplayAnalyzer, Warning, associate, effective_hit_window, hit_window,
    miss_context,
};
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::{Error, Result};
pub use export::{ExportFormat, JsonExporter, Series, SeriesKind, Timeline, TsvExporter};
pub use geometry::Point;
pub use level::{BreakPeriod, Level, LevelDefinition, Target, TargetKind};
pub use replay::{
    Compressor, GameMode, KeyCounter, Keys, LifeFrame, LzmaCodec, Mods, Replay, ReplayFrame,
    ReplayHeader, detect_presses,
};
