//! Fixed constants used by the codec and the analyzers
//!
//! The thresholds below were tuned empirically against real replays.
//! Analysis code reads them verbatim, so they live in one place.

/// Playfield geometry (osu! pixels)
pub mod playfield {
    pub const WIDTH: f64 = 512.0;
    pub const HEIGHT: f64 = 384.0;

    /// Circle radius at CS 0 and the per-CS shrink, `r = BASE - STEP * cs`
    pub const RADIUS_BASE: f64 = 54.4;
    pub const RADIUS_STEP: f64 = 4.48;
}

/// Replay container layout
pub mod codec {
    /// Optional-string marker: no string follows
    pub const STRING_ABSENT: u8 = 0x00;
    /// Optional-string marker: ULEB128 length and UTF-8 bytes follow
    pub const STRING_PRESENT: u8 = 0x0b;

    /// First field of the terminal record carrying the RNG seed
    pub const SEED_SENTINEL: &str = "-12345";
    pub const SEED_SENTINEL_VALUE: i32 = -12345;

    /// Leading event records that are protocol artifacts, not input
    pub const PROTOCOL_ARTIFACT_FRAMES: usize = 3;

    /// .NET ticks (100ns) per second
    pub const TICKS_PER_SECOND: i64 = 10_000_000;
    /// .NET ticks at 1970-01-01T00:00:00Z
    pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

    /// The blob length field is the compressed size minus this amount
    pub const BLOB_LENGTH_ADJUSTMENT: usize = 8;

    /// Size of the optional online score identifier after the event blob
    pub const ONLINE_SCORE_ID_SIZE: usize = 8;
}

/// Hit window derivation
pub mod window {
    /// `W = SLOPE * OD + INTERCEPT` (ms)
    pub const OD_SLOPE: f64 = -12.0;
    pub const OD_INTERCEPT: f64 = 259.5;

    /// Attempted hits are still recognised up to this multiple of W
    pub const ATTEMPT_MULTIPLIER: f64 = 3.0;

    /// Presses farther than this from a target's center are extra hits (px)
    pub const EXTRA_HIT_DISTANCE: f64 = 150.0;

    /// Speed-up factor applied by DoubleTime / Nightcore
    pub const DOUBLE_TIME_MULTIPLIER: f64 = 1.5;

    // Judgement windows, `BASE - STEP * OD` (ms)
    pub const GREAT_BASE: f64 = 79.5;
    pub const GREAT_STEP: f64 = 6.0;
    pub const GOOD_BASE: f64 = 139.5;
    pub const GOOD_STEP: f64 = 8.0;
    pub const MEH_BASE: f64 = 199.5;
    pub const MEH_STEP: f64 = 10.0;
}

/// Cursor teleport detection
pub mod teleport {
    /// Minimum jump for a zero-time (infinite speed) teleport (px)
    pub const INFINITE_SPEED_DISTANCE: f64 = 40.0;
    /// Minimum jump for a finite-speed teleport (px)
    pub const MIN_DISTANCE: f64 = 150.0;
    /// Minimum speed for a finite-speed teleport (px/ms)
    pub const MIN_SPEED: f64 = 6.0;
    /// Leading kinematic samples skipped before detection starts
    pub const WARMUP_SAMPLES: usize = 3;
}

/// Singletap consistency
pub mod tapping {
    /// Max gap between two single-tapped hits before it is flagged (ms)
    pub const SINGLETAP_LIMIT_MS: f64 = 90.0;
    /// Median key hold below this is inhumanly short (ms)
    pub const MIN_HUMAN_PRESS_MS: f64 = 30.0;
}

/// Report thresholds
pub mod report {
    /// Baseline unstable rate below which timing looks automated
    pub const UNSTABLE_RATE_BASELINE: f64 = 47.5;

    /// CS calibration: `cs = (INTERCEPT - radius) / SLOPE`
    pub const CS_RADIUS_INTERCEPT: f64 = 54.42;
    pub const CS_RADIUS_SLOPE: f64 = 4.48;

    /// Only frame deltas in (0, MAX) count toward the average frame time (ms)
    pub const FRAME_TIME_MAX_MS: i32 = 30;
    /// Aim-only frame time floor with DoubleTime / Nightcore (ms)
    pub const AIM_FRAME_TIME_SPED_UP_MS: f64 = 17.35;
    /// Aim-only frame time floor without HalfTime (ms)
    pub const AIM_FRAME_TIME_NORMAL_MS: f64 = 12.3;

    /// Aim consistency: worst hit closer to center than this looks assisted
    pub const CONSISTENT_AIM_WORST_PERFECTNESS: f64 = 0.5;
    /// Aim consistency: median hit closer to center than this looks assisted
    pub const CONSISTENT_AIM_MEDIAN_PERFECTNESS: f64 = 0.8;
    /// Aim consistency: perfectness variance below this looks assisted
    pub const CONSISTENT_AIM_VARIANCE: f64 = 0.01;

    /// Edge hits tighter than this count toward the relax warning
    pub const UNREALISTIC_EDGE_PERFECTNESS: f64 = 0.01;
}

/// Miss context extraction
pub mod context {
    /// Half extents of the box around a miss (px)
    pub const HALF_WIDTH: f64 = 128.0;
    pub const HALF_HEIGHT: f64 = 96.0;
}
