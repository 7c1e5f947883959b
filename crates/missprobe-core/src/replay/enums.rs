use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum GameMode {
    #[default]
    #[strum(serialize = "osu!")]
    Standard = 0,
    #[strum(serialize = "osu!taiko")]
    Taiko = 1,
    #[strum(serialize = "osu!catch")]
    Catch = 2,
    #[strum(serialize = "osu!mania")]
    Mania = 3,
}

impl GameMode {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }

    /// Only standard replays carry cursor positions that map onto targets
    pub fn has_cursor(&self) -> bool {
        matches!(self, Self::Standard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_mode_from_u8() {
        assert_eq!(GameMode::from_u8(0), Some(GameMode::Standard));
        assert_eq!(GameMode::from_u8(3), Some(GameMode::Mania));
        assert_eq!(GameMode::from_u8(4), None);
    }

    #[test]
    fn test_game_mode_names() {
        assert_eq!(GameMode::Standard.short_name(), "osu!");
        assert_eq!("osu!taiko".parse::<GameMode>().ok(), Some(GameMode::Taiko));
        assert!(GameMode::Standard.has_cursor());
        assert!(!GameMode::Catch.has_cursor());
    }
}
