//! Info command: header dump without touching the event stream.

use std::path::Path;

use anyhow::{Context, Result};
use missprobe_core::Replay;

/// Run the info command
pub fn run(replay_path: &Path) -> Result<()> {
    let bytes = std::fs::read(replay_path)
        .with_context(|| format!("Failed to read {}", replay_path.display()))?;
    let replay = Replay::decode_header(&bytes).context("Failed to decode replay header")?;
    let header = &replay.header;

    println!("=== Replay Header ===");
    println!("Mode:          {}", header.game_mode);
    println!("Version:       {}", header.format_version);
    println!("Player:        {}", header.player_name.as_deref().unwrap_or("-"));
    println!("Map hash:      {}", header.map_hash.as_deref().unwrap_or("-"));
    println!("Replay hash:   {}", header.replay_hash.as_deref().unwrap_or("-"));
    println!("Mods:          {}", header.mods);
    println!("Score:         {}", header.total_score);
    println!("Max combo:     {}", header.max_combo);
    println!("Perfect:       {}", header.is_perfect);
    println!(
        "Counts:        300: {}  100: {}  50: {}  geki: {}  katu: {}  miss: {}",
        header.count_300,
        header.count_100,
        header.count_50,
        header.count_geki,
        header.count_katu,
        header.count_miss
    );
    println!("Judged:        {}", header.judged_count());
    println!("Size:          {} bytes", bytes.len());

    Ok(())
}
