//! Replay / level compatibility checks run before analysis.

use missprobe_core::{GameMode, Level, Replay};

/// Validation result for a replay and level pair
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    UnsupportedMode(GameMode),
    EmptyLevel,
    HashMismatch { level: String, replay: String },
}

/// Check that the replay can be analyzed against the level
pub fn validate_inputs(replay: &Replay, level: &Level) -> ValidationResult {
    let mode = replay.header.game_mode;
    if !mode.has_cursor() {
        return ValidationResult::UnsupportedMode(mode);
    }

    if level.targets().is_empty() {
        return ValidationResult::EmptyLevel;
    }

    // A level without a hash is trusted
    if let Some(level_hash) = &level.hash {
        let replay_hash = replay.header.map_hash.as_deref().unwrap_or_default();
        if !level_hash.eq_ignore_ascii_case(replay_hash) {
            return ValidationResult::HashMismatch {
                level: level_hash.clone(),
                replay: replay_hash.to_string(),
            };
        }
    }

    ValidationResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use missprobe_core::{Point, ReplayHeader, Target};

    fn make_replay(mode: GameMode, hash: Option<&str>) -> Replay {
        Replay::new(ReplayHeader {
            game_mode: mode,
            map_hash: hash.map(str::to_string),
            ..Default::default()
        })
    }

    fn make_level(hash: Option<&str>) -> Level {
        let mut level = Level::new(8.0, 4.0);
        level.hash = hash.map(str::to_string);
        level.add_target(Target::circle(1000.0, Point::new(256.0, 192.0), 36.48));
        level
    }

    #[test]
    fn test_validate_inputs_valid() {
        let replay = make_replay(GameMode::Standard, Some("abc123"));
        assert_eq!(
            validate_inputs(&replay, &make_level(Some("ABC123"))),
            ValidationResult::Valid
        );
        assert_eq!(
            validate_inputs(&replay, &make_level(None)),
            ValidationResult::Valid
        );
    }

    #[test]
    fn test_validate_inputs_wrong_mode() {
        let replay = make_replay(GameMode::Mania, None);
        assert_eq!(
            validate_inputs(&replay, &make_level(None)),
            ValidationResult::UnsupportedMode(GameMode::Mania)
        );
    }

    #[test]
    fn test_validate_inputs_empty_level() {
        let replay = make_replay(GameMode::Standard, None);
        assert_eq!(
            validate_inputs(&replay, &Level::new(5.0, 4.0)),
            ValidationResult::EmptyLevel
        );
    }

    #[test]
    fn test_validate_inputs_hash_mismatch() {
        let replay = make_replay(GameMode::Standard, Some("ffff"));
        assert_eq!(
            validate_inputs(&replay, &make_level(Some("0000"))),
            ValidationResult::HashMismatch {
                level: "0000".to_string(),
                replay: "ffff".to_string()
            }
        );
    }
}
