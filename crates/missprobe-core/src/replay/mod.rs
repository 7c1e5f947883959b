//! Replay data model and binary codec.
//!
//! A [`Replay`] owns its frame and life-bar sequences. Derived records
//! elsewhere in the crate refer to frames by index only.

mod codec;
mod compression;
mod enums;
mod frame;
mod keys;
mod mods;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::kinematics;

pub use codec::{datetime_to_ticks, ticks_to_datetime};
pub use compression::{Compressor, LzmaCodec};
pub use enums::GameMode;
pub use frame::{LifeFrame, ReplayFrame};
pub use keys::{KeyCounter, Keys, detect_presses};
pub use mods::Mods;

/// Fixed header fields, in container order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayHeader {
    pub game_mode: GameMode,
    pub format_version: i32,
    pub map_hash: Option<String>,
    pub player_name: Option<String>,
    pub replay_hash: Option<String>,
    pub count_300: u16,
    pub count_100: u16,
    pub count_50: u16,
    pub count_geki: u16,
    pub count_katu: u16,
    pub count_miss: u16,
    pub total_score: u32,
    pub max_combo: u16,
    pub is_perfect: bool,
    pub mods: Mods,
}

impl ReplayHeader {
    /// Judged objects according to the replay's own counters
    pub fn judged_count(&self) -> u32 {
        u32::from(self.count_300)
            + u32::from(self.count_100)
            + u32::from(self.count_50)
            + u32::from(self.count_miss)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub header: ReplayHeader,
    pub life_frames: Vec<LifeFrame>,
    pub play_time: DateTime<Utc>,
    pub seed: i32,
    /// Trailing online score identifier, absent in old or local replays
    pub online_score_id: Option<i64>,
    frames: Vec<ReplayFrame>,
    /// Leading records dropped after decode, kept so encode can restore them
    preamble: Vec<ReplayFrame>,
    /// Frames with a positive delta, in order
    kinematic_indices: Vec<usize>,
    axis_flipped: bool,
    fully_loaded: bool,
}

impl Replay {
    /// Empty in-memory replay; frames are added with [`Replay::push_frame`]
    pub fn new(header: ReplayHeader) -> Self {
        Self {
            fully_loaded: true,
            ..Self::header_only(header)
        }
    }

    pub(crate) fn header_only(header: ReplayHeader) -> Self {
        Self {
            header,
            life_frames: Vec::new(),
            play_time: DateTime::<Utc>::default(),
            seed: 0,
            online_score_id: None,
            frames: Vec::new(),
            preamble: Vec::new(),
            kinematic_indices: Vec::new(),
            axis_flipped: false,
            fully_loaded: false,
        }
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.fully_loaded
    }

    /// Fails unless the event stream has been decoded
    pub fn ensure_fully_loaded(&self) -> Result<()> {
        if self.fully_loaded {
            Ok(())
        } else {
            Err(Error::incomplete(
                "replay frames are not loaded (header only)",
            ))
        }
    }

    pub fn frames(&self) -> &[ReplayFrame] {
        &self.frames
    }

    pub(crate) fn frames_mut(&mut self) -> &mut [ReplayFrame] {
        &mut self.frames
    }

    pub fn mods(&self) -> Mods {
        self.header.mods
    }

    pub fn is_axis_flipped(&self) -> bool {
        self.axis_flipped
    }

    /// Append a frame, deriving its absolute time from the previous one
    pub fn push_frame(&mut self, time_delta: i32, x: f32, y: f32, keys: Keys) {
        let last_time = self.frames.last().map_or(0, |f| f.time);
        self.frames.push(ReplayFrame::new(
            time_delta,
            last_time.saturating_add(time_delta),
            x,
            y,
            keys,
        ));
    }

    /// Recompute distance, speed and acceleration over the frame sequence
    pub fn compute_kinematics(&mut self) {
        self.kinematic_indices = kinematics::compute(&mut self.frames);
        debug!(
            "Kinematics over {} of {} frames",
            self.kinematic_indices.len(),
            self.frames.len()
        );
    }

    /// Indices of the frames that carry kinematics
    pub fn kinematic_indices(&self) -> &[usize] {
        &self.kinematic_indices
    }

    /// Frames that carry kinematics, in order
    pub fn kinematic_frames(&self) -> impl Iterator<Item = &ReplayFrame> + '_ {
        self.kinematic_indices.iter().map(|&i| &self.frames[i])
    }

    /// Mirror every frame about the playfield's horizontal center line
    pub fn flip_vertical(&mut self) {
        self.axis_flipped = !self.axis_flipped;
        for frame in &mut self.frames {
            frame.y = (crate::constants::playfield::HEIGHT - f64::from(frame.y)) as f32;
        }
    }

    /// NoFail always passes; otherwise the life bar must never empty
    pub fn is_pass(&self) -> bool {
        self.header.mods.contains(Mods::NO_FAIL)
            || self.life_frames.iter().all(|l| l.percentage > 0.0)
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} +{} on {}",
            self.header.player_name.as_deref().unwrap_or("<unknown>"),
            self.header.mods,
            self.play_time.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
