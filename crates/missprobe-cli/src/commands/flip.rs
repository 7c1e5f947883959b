//! Flip command: mirror a replay about the playfield's horizontal axis.

use std::path::Path;

use anyhow::{Context, Result};

use super::load_replay;

/// Run the flip command
pub fn run(input: &Path, output: &Path) -> Result<()> {
    let mut replay = load_replay(input)?;
    replay.flip_vertical();
    replay
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    eprintln!("Flipped {} frames into {}", replay.frames().len(), output.display());
    Ok(())
}
