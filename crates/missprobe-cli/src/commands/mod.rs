//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod analyze;
pub mod export;
pub mod flip;
pub mod hexdump;
pub mod info;
pub mod misses;
pub mod timeline;

use std::path::Path;

use anyhow::{Context, Result, bail};
use missprobe_core::{Level, Replay};

use crate::validation::{ValidationResult, validate_inputs};

pub(crate) fn load_replay(path: &Path) -> Result<Replay> {
    Replay::from_file(path).with_context(|| format!("Failed to decode replay {}", path.display()))
}

pub(crate) fn load_level(path: &Path) -> Result<Level> {
    Level::load(path).with_context(|| format!("Failed to load level {}", path.display()))
}

/// Load both inputs and refuse pairs that cannot be analyzed together
pub(crate) fn load_pair(replay_path: &Path, level_path: &Path) -> Result<(Replay, Level)> {
    let replay = load_replay(replay_path)?;
    let level = load_level(level_path)?;

    match validate_inputs(&replay, &level) {
        ValidationResult::Valid => Ok((replay, level)),
        ValidationResult::UnsupportedMode(mode) => {
            bail!("Replay is for {}, only osu! standard is supported", mode)
        }
        ValidationResult::EmptyLevel => bail!("Level {} has no targets", level_path.display()),
        ValidationResult::HashMismatch { level, replay } => {
            bail!("Replay was played on map {} but the level is {}", replay, level)
        }
    }
}
