use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::constants::window;

/// Gameplay modifier bitset as stored in the replay header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mods(u32);

impl Mods {
    pub const NONE: Mods = Mods(0);
    pub const NO_FAIL: Mods = Mods(1 << 0);
    pub const EASY: Mods = Mods(1 << 1);
    pub const TOUCH_DEVICE: Mods = Mods(1 << 2);
    pub const HIDDEN: Mods = Mods(1 << 3);
    pub const HARD_ROCK: Mods = Mods(1 << 4);
    pub const SUDDEN_DEATH: Mods = Mods(1 << 5);
    pub const DOUBLE_TIME: Mods = Mods(1 << 6);
    pub const RELAX: Mods = Mods(1 << 7);
    pub const HALF_TIME: Mods = Mods(1 << 8);
    pub const NIGHTCORE: Mods = Mods(1 << 9);
    pub const FLASHLIGHT: Mods = Mods(1 << 10);
    pub const AUTOPLAY: Mods = Mods(1 << 11);
    pub const SPUN_OUT: Mods = Mods(1 << 12);
    pub const AUTOPILOT: Mods = Mods(1 << 13);
    pub const PERFECT: Mods = Mods(1 << 14);
    pub const CINEMA: Mods = Mods(1 << 22);
    pub const TARGET_PRACTICE: Mods = Mods(1 << 23);
    pub const SCORE_V2: Mods = Mods(1 << 29);
    pub const MIRROR: Mods = Mods(1 << 30);

    const NAMES: [(Mods, &'static str); 19] = [
        (Mods::NO_FAIL, "NoFail"),
        (Mods::EASY, "Easy"),
        (Mods::TOUCH_DEVICE, "TouchDevice"),
        (Mods::HIDDEN, "Hidden"),
        (Mods::HARD_ROCK, "HardRock"),
        (Mods::SUDDEN_DEATH, "SuddenDeath"),
        (Mods::DOUBLE_TIME, "DoubleTime"),
        (Mods::RELAX, "Relax"),
        (Mods::HALF_TIME, "HalfTime"),
        (Mods::NIGHTCORE, "Nightcore"),
        (Mods::FLASHLIGHT, "Flashlight"),
        (Mods::AUTOPLAY, "Autoplay"),
        (Mods::SPUN_OUT, "SpunOut"),
        (Mods::AUTOPILOT, "Autopilot"),
        (Mods::PERFECT, "Perfect"),
        (Mods::CINEMA, "Cinema"),
        (Mods::TARGET_PRACTICE, "TargetPractice"),
        (Mods::SCORE_V2, "ScoreV2"),
        (Mods::MIRROR, "Mirror"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Mods) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// HardRock mirrors the playfield vertically
    pub fn flips_playfield(self) -> bool {
        self.contains(Mods::HARD_ROCK)
    }

    pub fn is_sped_up(self) -> bool {
        self.contains(Mods::DOUBLE_TIME) || self.contains(Mods::NIGHTCORE)
    }

    pub fn is_slowed_down(self) -> bool {
        self.contains(Mods::HALF_TIME)
    }

    /// Factor applied to time thresholds that are measured in real time
    pub fn time_multiplier(self) -> f64 {
        if self.is_sped_up() {
            window::DOUBLE_TIME_MULTIPLIER
        } else {
            1.0
        }
    }

    /// Names of the set modifiers, lowest bit first
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(m, _)| self.contains(*m))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for Mods {
    type Output = Mods;

    fn bitor(self, rhs: Mods) -> Mods {
        Mods(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mods {
    fn bitor_assign(&mut self, rhs: Mods) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Mods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            f.write_str("None")
        } else {
            f.write_str(&names.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mods_display() {
        assert_eq!(Mods::NONE.to_string(), "None");
        assert_eq!(
            (Mods::HIDDEN | Mods::HARD_ROCK).to_string(),
            "Hidden, HardRock"
        );
    }

    #[test]
    fn test_time_multiplier() {
        assert_eq!(Mods::NONE.time_multiplier(), 1.0);
        assert_eq!(Mods::DOUBLE_TIME.time_multiplier(), 1.5);
        assert_eq!(
            (Mods::DOUBLE_TIME | Mods::NIGHTCORE).time_multiplier(),
            1.5
        );
        assert_eq!(Mods::HALF_TIME.time_multiplier(), 1.0);
    }

    #[test]
    fn test_unknown_bits_survive() {
        let mods = Mods::from_bits(0x8000_0011);
        assert_eq!(mods.bits(), 0x8000_0011);
        assert!(mods.flips_playfield());
        assert!(mods.contains(Mods::NO_FAIL));
    }
}
